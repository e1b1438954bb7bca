//! JSON-RPC wire types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use crate::error::CtlError;

/// Every invocation sends exactly one request, always with this id.
pub const REQUEST_ID: u64 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Box<RawValue>>,
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    /// `None` only when the member is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "keep_null")]
    pub result: Option<Box<RawValue>>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
    #[serde(default)]
    pub id: Value,
}

fn keep_null<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    pub fn parse(text: &str) -> Result<Self, CtlError> {
        serde_json::from_str(text)
            .map_err(|e| CtlError::transport(format!("malformed response: {e}")))
    }

    pub fn is_for(&self, id: u64) -> bool {
        self.id.as_u64() == Some(id)
    }

    /// Server error envelope wins over any result member.
    pub fn into_result(self) -> Result<Option<Box<RawValue>>, CtlError> {
        match self.error {
            Some(err) => Err(CtlError::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }
}
