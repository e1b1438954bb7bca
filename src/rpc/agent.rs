/*!
Agent transport.

The agent is an out-of-process helper holding a long-lived authenticated
connection to the daemon. It is discovered through `WSRPC_AGENT`, which names
a Unix domain socket. Each call writes one JSON line

    {"address":..,"user":..,"pass":..,"rootcert":..,"method":..,"params":[..],"id":1}

and reads one JSON-RPC response line back. Connection lifecycle, retries and
reconnection toward the daemon are the agent's business.
*/

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::value::RawValue;

use super::context::CallContext;
use super::wire::{REQUEST_ID, RpcResponse};
use super::{Caller, TransportConfig};
use crate::error::CtlError;

/// Environment variable naming the agent socket.
pub const AGENT_ENV: &str = "WSRPC_AGENT";

/// Agent socket from the environment, if set and present on disk.
pub fn discover() -> Option<PathBuf> {
    discover_from(std::env::var_os(AGENT_ENV).map(PathBuf::from))
}

fn discover_from(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty() && p.exists())
}

#[derive(Serialize)]
struct AgentRequest<'a> {
    address: &'a str,
    user: &'a str,
    pass: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rootcert: Option<&'a str>,
    method: &'a str,
    params: &'a [Box<RawValue>],
    id: u64,
}

#[derive(Debug)]
pub struct AgentCaller {
    socket: PathBuf,
    address: String,
    user: String,
    pass: String,
    root_cert: Option<String>,
}

impl AgentCaller {
    pub fn new(socket: PathBuf, cfg: &TransportConfig) -> Result<Self, CtlError> {
        let root_cert = match &cfg.ca_cert {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                CtlError::dial(format!("read certificate file {}: {e}", path.display()))
            })?),
            None => None,
        };
        Ok(Self {
            socket,
            address: cfg.server()?.to_string(),
            user: cfg.user.clone().unwrap_or_default(),
            pass: cfg.pass.clone().unwrap_or_default(),
            root_cert,
        })
    }

    fn request_line(&self, method: &str, params: &[Box<RawValue>]) -> Result<Vec<u8>, CtlError> {
        let mut line = serde_json::to_vec(&AgentRequest {
            address: &self.address,
            user: &self.user,
            pass: &self.pass,
            rootcert: self.root_cert.as_deref(),
            method,
            params,
            id: REQUEST_ID,
        })
        .map_err(CtlError::Encoding)?;
        line.push(b'\n');
        Ok(line)
    }

    #[cfg(unix)]
    async fn round_trip(
        &self,
        method: &str,
        params: &[Box<RawValue>],
    ) -> Result<Option<Box<RawValue>>, CtlError> {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
        use tokio::net::UnixStream;

        let line = self.request_line(method, params)?;
        let stream = UnixStream::connect(&self.socket).await.map_err(|e| {
            CtlError::dial(format!("connect agent {}: {e}", self.socket.display()))
        })?;
        let (read_half, mut write_half) = stream.into_split();
        write_half
            .write_all(&line)
            .await
            .map_err(|e| CtlError::transport(format!("agent write: {e}")))?;

        let mut reader = BufReader::new(read_half);
        let mut reply = String::new();
        let n = reader
            .read_line(&mut reply)
            .await
            .map_err(|e| CtlError::transport(format!("agent read: {e}")))?;
        if n == 0 {
            return Err(CtlError::transport("agent closed connection before response"));
        }
        RpcResponse::parse(reply.trim_end())?.into_result()
    }

    #[cfg(not(unix))]
    async fn round_trip(
        &self,
        _method: &str,
        _params: &[Box<RawValue>],
    ) -> Result<Option<Box<RawValue>>, CtlError> {
        Err(CtlError::dial("agent transport requires unix domain sockets"))
    }
}

#[async_trait]
impl Caller for AgentCaller {
    async fn call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        out: &mut Option<Box<RawValue>>,
        params: &[Box<RawValue>],
    ) -> Result<(), CtlError> {
        let result = ctx.run(self.round_trip(method, params)).await?;
        *out = result;
        Ok(())
    }
}
