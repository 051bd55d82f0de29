//! Transfer operations and their canonical byte layout
//!
//! ```text
//! varint(fee) || varint(expire_period) || varint(type) || recipient_hash[32] || varint(amount)
//! ```

use crate::address::{Address, ADDRESS_HASH_LENGTH};
use crate::varint::{decode_varint, varint_len, write_varint};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Periods added to the current period to get an operation's expiry
pub const EXPIRE_PERIOD_OFFSET: u64 = 10;

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Native coin transfer
    Transfer,
}

impl OperationType {
    /// Wire identifier
    pub const fn id(self) -> u64 {
        match self {
            OperationType::Transfer => 0,
        }
    }
}

impl TryFrom<u64> for OperationType {
    type Error = Error;

    fn try_from(id: u64) -> Result<Self> {
        match id {
            0 => Ok(OperationType::Transfer),
            other => Err(Error::MalformedOperation(format!(
                "unsupported operation type {other}"
            ))),
        }
    }
}

/// Transfer operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Fee in nano-units
    pub fee: u64,
    /// Last period in which the operation may be included
    pub expire_period: u64,
    /// Operation kind
    pub op_type: OperationType,
    /// Recipient address
    pub recipient: Address,
    /// Transferred amount in nano-units
    pub amount: u64,
}

impl Operation {
    /// Build a transfer. Zero amounts are rejected.
    pub fn transfer(recipient: Address, amount: u64, fee: u64, expire_period: u64) -> Result<Self> {
        if amount == 0 {
            return Err(Error::InvalidAmount("amount must be greater than zero".to_string()));
        }
        Ok(Self {
            fee,
            expire_period,
            op_type: OperationType::Transfer,
            recipient,
            amount,
        })
    }

    /// Exact length of [`Operation::serialize`] output
    pub fn serialized_len(&self) -> usize {
        varint_len(self.fee)
            + varint_len(self.expire_period)
            + varint_len(self.op_type.id())
            + ADDRESS_HASH_LENGTH
            + varint_len(self.amount)
    }

    /// Canonical bytes
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        write_varint(&mut out, self.fee);
        write_varint(&mut out, self.expire_period);
        write_varint(&mut out, self.op_type.id());
        out.extend_from_slice(self.recipient.hash());
        write_varint(&mut out, self.amount);
        out
    }

    /// Decode canonical bytes. The whole slice must be consumed.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { bytes, pos: 0 };

        let fee = reader.varint("fee")?;
        let expire_period = reader.varint("expire period")?;
        let op_type = OperationType::try_from(reader.varint("type")?)?;
        let recipient = Address::from_hash(reader.hash()?);
        let amount = reader.varint("amount")?;

        if reader.pos != bytes.len() {
            return Err(Error::MalformedOperation(format!(
                "{} trailing bytes",
                bytes.len() - reader.pos
            )));
        }

        Ok(Self {
            fee,
            expire_period,
            op_type,
            recipient,
            amount,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn varint(&mut self, field: &str) -> Result<u64> {
        let (value, used) = decode_varint(&self.bytes[self.pos..]).map_err(|e| match e {
            Error::MalformedOperation(reason) => {
                Error::MalformedOperation(format!("{field}: {reason}"))
            }
            other => other,
        })?;
        self.pos += used;
        Ok(value)
    }

    fn hash(&mut self) -> Result<[u8; ADDRESS_HASH_LENGTH]> {
        let remaining = &self.bytes[self.pos..];
        if remaining.len() < ADDRESS_HASH_LENGTH {
            return Err(Error::MalformedOperation(format!(
                "recipient: expected {ADDRESS_HASH_LENGTH} bytes, got {}",
                remaining.len()
            )));
        }
        let mut hash = [0u8; ADDRESS_HASH_LENGTH];
        hash.copy_from_slice(&remaining[..ADDRESS_HASH_LENGTH]);
        self.pos += ADDRESS_HASH_LENGTH;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Operation {
        Operation::transfer(Address::test_address(), 1_500_000_000, 10_000_000, 1_000_010).unwrap()
    }

    #[test]
    fn test_layout() {
        let op = sample();
        let bytes = op.serialize();
        assert_eq!(bytes.len(), op.serialized_len());
        // fee (4) + expire (3) + type (1)
        assert_eq!(bytes[7], 0);
        assert_eq!(&bytes[8..40], Address::test_address().hash());
    }

    #[test]
    fn test_deserialize_inverse() {
        let op = sample();
        assert_eq!(Operation::deserialize(&op.serialize()).unwrap(), op);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let err = Operation::transfer(Address::test_address(), 0, 1, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
    }

    #[test]
    fn test_deserialize_short_recipient() {
        let bytes = sample().serialize();
        let err = Operation::deserialize(&bytes[..20]).unwrap_err();
        assert!(matches!(err, Error::MalformedOperation(_)));
    }

    #[test]
    fn test_deserialize_trailing_bytes() {
        let mut bytes = sample().serialize();
        bytes.push(0);
        assert!(matches!(
            Operation::deserialize(&bytes),
            Err(Error::MalformedOperation(_))
        ));
    }

    #[test]
    fn test_deserialize_truncated_amount() {
        let mut bytes = sample().serialize();
        let last = bytes.len() - 1;
        bytes[last] |= 0x80;
        assert!(Operation::deserialize(&bytes).is_err());
    }

    #[test]
    fn test_deserialize_unknown_type() {
        let mut bytes = sample().serialize();
        bytes[7] = 3;
        assert!(matches!(
            Operation::deserialize(&bytes),
            Err(Error::MalformedOperation(_))
        ));
    }

    #[test]
    fn test_deserialize_empty() {
        assert!(Operation::deserialize(&[]).is_err());
    }
}
