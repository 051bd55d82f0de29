//! JSON-RPC 2.0 request and reply envelopes

use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Version tag sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Always [`JSONRPC_VERSION`]
    pub jsonrpc: &'static str,
    /// Method name
    pub method: String,
    /// Positional parameters
    pub params: Value,
    /// Request id
    pub id: u64,
}

impl JsonRpcRequest {
    /// Build a request with a fresh id.
    pub fn new(method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_string(),
            params,
            id: REQUEST_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Decoded reply body
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `result` member was present (it may be `null`)
    Result(Value),
    /// `error` member was present instead
    Error {
        /// Error code, 0 when the node sent none
        code: i64,
        /// Error message
        message: String,
    },
}

impl Reply {
    /// Classify a reply body.
    ///
    /// A body with neither member, or one that is not an object, is malformed.
    pub fn parse(body: Value) -> Result<Self> {
        let mut object = match body {
            Value::Object(object) => object,
            other => {
                return Err(Error::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    kind(&other)
                )))
            }
        };

        if let Some(result) = object.remove("result") {
            return Ok(Reply::Result(result));
        }

        match object.remove("error") {
            Some(Value::Object(error)) => Ok(parse_error_object(error)),
            Some(Value::String(message)) => Ok(Reply::Error { code: 0, message }),
            Some(Value::Null) | None => Err(Error::MalformedResponse(
                "reply has neither result nor error".to_string(),
            )),
            Some(other) => Ok(Reply::Error {
                code: 0,
                message: other.to_string(),
            }),
        }
    }

    /// Turn the reply into the call's outcome.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Reply::Result(value) => Ok(value),
            Reply::Error { code, message } => Err(Error::Rpc { code, message }),
        }
    }
}

fn parse_error_object(mut error: Map<String, Value>) -> Reply {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = match error.remove("message") {
        Some(Value::String(message)) => message,
        Some(other) => other.to_string(),
        None => Value::Object(error).to_string(),
    };
    Reply::Error { code, message }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
