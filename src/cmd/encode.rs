//! Request encoding.
//!
//! The descriptor's constructor performs coercion; the resulting command is
//! serialized into a full envelope and the `params` array is parsed back out
//! as raw JSON, so what goes on the wire is exactly what a decoder of the
//! envelope would see.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use crate::cmd::resolve::MethodDescriptor;
use crate::error::CtlError;
use crate::rpc::wire::{REQUEST_ID, RpcRequest};

#[derive(Serialize)]
struct Envelope<'a> {
    method: &'a str,
    params: &'a [Value],
    id: u64,
}

#[derive(Deserialize)]
struct EnvelopeParams {
    params: Vec<Box<RawValue>>,
}

pub fn encode(desc: &MethodDescriptor<'_>, args: &[String]) -> Result<RpcRequest, CtlError> {
    let cmd = desc.construct(args)?;

    let marshalled = serde_json::to_vec(&Envelope {
        method: cmd.method,
        params: &cmd.params,
        id: REQUEST_ID,
    })
    .map_err(CtlError::Encoding)?;

    let EnvelopeParams { params } =
        serde_json::from_slice(&marshalled).map_err(CtlError::Encoding)?;

    Ok(RpcRequest {
        method: cmd.method.to_string(),
        params,
        id: REQUEST_ID,
    })
}
