//! Parsers for node status responses
//!
//! Nodes expose the same facts under different keys depending on version.
//! Each fact gets a small enum naming every shape we accept, tried in a
//! fixed order.

use serde_json::Value;

/// Version reported when the node omits one
pub const DEFAULT_NODE_VERSION: &str = "1.0.0";

/// Read a non-negative integer given as a JSON number or a numeric string.
pub(crate) fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Where the current period was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodShape {
    /// `last_slot.period`
    LastSlot(u64),
    /// `current_cycle * periods_per_cycle + cycle_duration`
    CycleDerived {
        /// `current_cycle`
        current_cycle: u64,
        /// `periods_per_cycle`
        periods_per_cycle: u64,
        /// `cycle_duration`, 0 when absent
        cycle_duration: u64,
    },
    /// Top-level `period`
    Flat(u64),
}

impl PeriodShape {
    /// First matching shape in `status`, if any.
    pub fn parse(status: &Value) -> Option<Self> {
        if let Some(period) = status.pointer("/last_slot/period").and_then(lenient_u64) {
            return Some(PeriodShape::LastSlot(period));
        }

        let cycle = status.get("current_cycle").and_then(lenient_u64);
        let per_cycle = status.get("periods_per_cycle").and_then(lenient_u64);
        if let (Some(current_cycle), Some(periods_per_cycle)) = (cycle, per_cycle) {
            let cycle_duration = status
                .get("cycle_duration")
                .and_then(lenient_u64)
                .unwrap_or(0);
            return Some(PeriodShape::CycleDerived {
                current_cycle,
                periods_per_cycle,
                cycle_duration,
            });
        }

        status
            .get("period")
            .and_then(lenient_u64)
            .map(PeriodShape::Flat)
    }

    /// Period value, `None` if the derived form overflows.
    pub fn period(self) -> Option<u64> {
        match self {
            PeriodShape::LastSlot(period) | PeriodShape::Flat(period) => Some(period),
            PeriodShape::CycleDerived {
                current_cycle,
                periods_per_cycle,
                cycle_duration,
            } => current_cycle
                .checked_mul(periods_per_cycle)?
                .checked_add(cycle_duration),
        }
    }
}

/// How the peer count was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerShape {
    /// `connected_nodes` as a number
    Count(u64),
    /// `connected_nodes` as an object keyed by node id
    NodeMap(usize),
    /// `connected_nodes` as an array of nodes
    NodeList(usize),
    /// Missing or unrecognised
    Absent,
}

impl PeerShape {
    /// Classify `status.connected_nodes`.
    pub fn parse(status: &Value) -> Self {
        match status.get("connected_nodes") {
            Some(Value::Object(nodes)) => PeerShape::NodeMap(nodes.len()),
            Some(Value::Array(nodes)) => PeerShape::NodeList(nodes.len()),
            Some(value) => lenient_u64(value).map_or(PeerShape::Absent, PeerShape::Count),
            None => PeerShape::Absent,
        }
    }

    /// Peer count, 0 when absent.
    pub fn count(self) -> u32 {
        let count = match self {
            PeerShape::Count(n) => n,
            PeerShape::NodeMap(n) | PeerShape::NodeList(n) => n as u64,
            PeerShape::Absent => 0,
        };
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Snapshot of a node's status, fetched per call and never cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    /// Current period, if any shape carried one
    pub current_period: Option<u64>,
    /// Connected peers
    pub connected_peers: u32,
    /// Node version
    pub version: String,
}

impl NetworkStatus {
    /// Read every known field out of a `get_status` result.
    pub fn from_value(status: &Value) -> Self {
        let version = match status.get("version") {
            Some(Value::String(v)) if !v.is_empty() => v.clone(),
            _ => DEFAULT_NODE_VERSION.to_string(),
        };
        Self {
            current_period: PeriodShape::parse(status).and_then(PeriodShape::period),
            connected_peers: PeerShape::parse(status).count(),
            version,
        }
    }

    /// Period used as the displayed block height.
    ///
    /// Only `last_slot.period` and the flat `period` count here; the
    /// cycle-derived estimate is used for expiry only.
    pub fn block_height(status: &Value) -> Option<u64> {
        status
            .pointer("/last_slot/period")
            .and_then(lenient_u64)
            .or_else(|| status.get("period").and_then(lenient_u64))
    }
}
