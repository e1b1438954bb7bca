//! Transport selection and the single-call `Caller` interface.
//!
//! strategy(cfg) -> Strategy { Agent | Direct } (pure, resolved once)
//! connect(cfg, ctx) -> Transport (dials for Direct; Agent needs no handshake)
//! Transport::call performs exactly one round trip. Nothing here retries.

pub mod agent;
pub mod context;
pub mod direct;
mod pem;
pub mod wire;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use url::Url;

use crate::error::CtlError;

pub use agent::AgentCaller;
pub use context::CallContext;
pub use direct::DirectCaller;

/// How the client authenticates to the daemon.
#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// HTTP basic credentials on the websocket upgrade
    #[default]
    Basic,
    /// TLS client certificate
    #[value(name = "clientcert")]
    ClientCert,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Basic => f.write_str("basic"),
            AuthType::ClientCert => f.write_str("clientcert"),
        }
    }
}

/// Immutable connection settings for one invocation.
#[derive(Clone, Default)]
pub struct TransportConfig {
    /// Server URL with an explicit port.
    pub server: Option<Url>,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Sole trust root for server certificate validation.
    pub ca_cert: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    /// SOCKS5 proxy `host:port`.
    pub proxy: Option<String>,
    pub proxy_user: Option<String>,
    pub proxy_pass: Option<String>,
    pub auth_type: AuthType,
    /// Agent socket discovered from the environment, if any.
    pub agent: Option<PathBuf>,
}

impl TransportConfig {
    pub fn server(&self) -> Result<&Url, CtlError> {
        self.server
            .as_ref()
            .ok_or_else(|| CtlError::dial("no server URL configured"))
    }

    /// Basic credentials, when configured and the auth type calls for them.
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        if self.auth_type != AuthType::Basic {
            return None;
        }
        let user = self.user.as_deref().unwrap_or("");
        let pass = self.pass.as_deref().unwrap_or("");
        if user.is_empty() && pass.is_empty() {
            None
        } else {
            Some((user, pass))
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("server", &self.server.as_ref().map(Url::as_str))
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .field("ca_cert", &self.ca_cert)
            .field("client_cert", &self.client_cert)
            .field("client_key", &self.client_key)
            .field("proxy", &self.proxy)
            .field("proxy_user", &self.proxy_user)
            .field("proxy_pass", &self.proxy_pass.as_ref().map(|_| "<redacted>"))
            .field("auth_type", &self.auth_type)
            .field("agent", &self.agent)
            .finish()
    }
}

/// Issue one request and bind its raw result into `out`.
///
/// `out` is written only after a complete successful response.
#[async_trait]
pub trait Caller: Send {
    async fn call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        out: &mut Option<Box<RawValue>>,
        params: &[Box<RawValue>],
    ) -> Result<(), CtlError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Agent(PathBuf),
    Direct,
}

/// The agent cannot tunnel through a proxy, so a proxy forces the direct path.
pub fn strategy(cfg: &TransportConfig) -> Strategy {
    match (&cfg.proxy, &cfg.agent) {
        (None, Some(socket)) => Strategy::Agent(socket.clone()),
        _ => Strategy::Direct,
    }
}

pub enum Transport {
    Agent(AgentCaller),
    Direct(DirectCaller),
}

pub async fn connect(cfg: &TransportConfig, ctx: &CallContext) -> Result<Transport, CtlError> {
    match strategy(cfg) {
        Strategy::Agent(socket) => {
            tracing::info!(socket = %socket.display(), "using agent transport");
            Ok(Transport::Agent(AgentCaller::new(socket, cfg)?))
        }
        Strategy::Direct => {
            tracing::info!(
                proxied = cfg.proxy.is_some(),
                auth = %cfg.auth_type,
                "using direct websocket transport"
            );
            Ok(Transport::Direct(DirectCaller::dial(cfg, ctx).await?))
        }
    }
}

#[async_trait]
impl Caller for Transport {
    async fn call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        out: &mut Option<Box<RawValue>>,
        params: &[Box<RawValue>],
    ) -> Result<(), CtlError> {
        match self {
            Transport::Agent(c) => c.call(ctx, method, out, params).await,
            Transport::Direct(c) => c.call(ctx, method, out, params).await,
        }
    }
}
