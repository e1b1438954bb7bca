//! Connection settings: CLI flags layered over an optional YAML file,
//! defaults filled from the daemons' data directories.
//!
//! resolve(args) -> Settings { transport, timeout }

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use url::Url;

use crate::rpc::{AuthType, TransportConfig, agent};
use crate::utils::paths::{app_data_dir, expand_path};

pub const DEFAULT_SERVER: &str = "wss://localhost/ws";
const CONFIG_FILE_NAME: &str = "dcrctl.yaml";
const CERT_FILE_NAME: &str = "rpc.cert";
const CLIENT_CERT_NAME: &str = "client.pem";
const CLIENT_KEY_NAME: &str = "client-key.pem";

/// Connection flags shared by every invocation.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a YAML configuration file
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// RPC server to connect to [default: wss://localhost/ws]
    #[arg(short = 's', long = "server", value_name = "URL")]
    pub server: Option<String>,

    /// Connect to the wallet RPC server instead of the chain server
    #[arg(long)]
    pub wallet: bool,

    /// Connect to testnet
    #[arg(long)]
    pub testnet: bool,

    /// Connect to the simulation test network
    #[arg(long)]
    pub simnet: bool,

    /// RPC username
    #[arg(short = 'u', long = "rpcuser", value_name = "USER")]
    pub rpc_user: Option<String>,

    /// RPC password
    #[arg(short = 'P', long = "rpcpass", value_name = "PASS")]
    pub rpc_pass: Option<String>,

    /// RPC server certificate chain for validation
    #[arg(short = 'c', long = "rpccert", value_name = "FILE")]
    pub rpc_cert: Option<String>,

    /// Connect via SOCKS5 proxy (eg. 127.0.0.1:9050)
    #[arg(long, value_name = "HOST:PORT")]
    pub proxy: Option<String>,

    /// Username for proxy server
    #[arg(long = "proxyuser", value_name = "USER")]
    pub proxy_user: Option<String>,

    /// Password for proxy server
    #[arg(long = "proxypass", value_name = "PASS")]
    pub proxy_pass: Option<String>,

    /// Authentication method for the RPC server
    #[arg(long = "authtype", value_enum, value_name = "TYPE")]
    pub auth_type: Option<AuthType>,

    /// Client certificate for clientcert auth
    #[arg(long = "clientcert", value_name = "FILE")]
    pub client_cert: Option<String>,

    /// Client key for clientcert auth
    #[arg(long = "clientkey", value_name = "FILE")]
    pub client_key: Option<String>,

    /// Abort the request after this many seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// On-disk configuration. Every key is optional; unknown keys are ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub server: Option<String>,
    pub wallet: Option<bool>,
    pub testnet: Option<bool>,
    pub simnet: Option<bool>,
    pub rpcuser: Option<String>,
    pub rpcpass: Option<String>,
    pub rpccert: Option<String>,
    pub proxy: Option<String>,
    pub proxyuser: Option<String>,
    pub proxypass: Option<String>,
    pub authtype: Option<AuthType>,
    pub clientcert: Option<String>,
    pub clientkey: Option<String>,
    pub timeout: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let blank = text
            .lines()
            .map(str::trim)
            .all(|l| l.is_empty() || l.starts_with('#') || l == "---");
        if blank {
            return Ok(Self::default());
        }
        let parsed: Option<FileConfig> = serde_yaml::from_str(text)?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config file {}", path.display()))
    }
}

/// Data directories consulted for default file locations.
#[derive(Debug, Clone)]
pub struct AppDirs {
    pub ctl: PathBuf,
    pub chain: PathBuf,
    pub wallet: PathBuf,
}

impl AppDirs {
    pub fn discover() -> Self {
        Self {
            ctl: app_data_dir("dcrctl"),
            chain: app_data_dir("dcrd"),
            wallet: app_data_dir("dcrwallet"),
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub transport: TransportConfig,
    pub timeout: Option<Duration>,
}

/// Resolve settings from flags, the config file and the environment.
pub fn resolve(args: &ConfigArgs) -> Result<Settings> {
    let dirs = AppDirs::discover();
    let file = match &args.config {
        Some(path) => FileConfig::load(&expand_path(&path.to_string_lossy()))?,
        None => {
            let path = dirs.ctl.join(CONFIG_FILE_NAME);
            if path.is_file() {
                FileConfig::load(&path)?
            } else {
                FileConfig::default()
            }
        }
    };
    resolve_with(args, file, &dirs, agent::discover())
}

pub(crate) fn resolve_with(
    args: &ConfigArgs,
    file: FileConfig,
    dirs: &AppDirs,
    agent: Option<PathBuf>,
) -> Result<Settings> {
    let wallet = args.wallet || file.wallet.unwrap_or(false);
    let testnet = args.testnet || file.testnet.unwrap_or(false);
    let simnet = args.simnet || file.simnet.unwrap_or(false);
    if testnet && simnet {
        bail!("the testnet and simnet params can't be used together -- choose one of the two");
    }

    let auth_type = args.auth_type.or(file.authtype).unwrap_or_default();

    let rpc_cert = match args.rpc_cert.clone().or(file.rpccert) {
        Some(path) => Some(expand_path(&path)),
        None => default_rpc_cert(dirs, wallet),
    };

    let (client_cert, client_key) = match auth_type {
        AuthType::ClientCert => (
            Some(
                args.client_cert
                    .clone()
                    .or(file.clientcert)
                    .map(|p| expand_path(&p))
                    .unwrap_or_else(|| dirs.ctl.join(CLIENT_CERT_NAME)),
            ),
            Some(
                args.client_key
                    .clone()
                    .or(file.clientkey)
                    .map(|p| expand_path(&p))
                    .unwrap_or_else(|| dirs.ctl.join(CLIENT_KEY_NAME)),
            ),
        ),
        AuthType::Basic => (None, None),
    };

    let raw_server = args
        .server
        .clone()
        .or(file.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let server = normalize_server(&raw_server, default_port(wallet, testnet, simnet))?;

    let timeout = args
        .timeout
        .or(file.timeout)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let transport = TransportConfig {
        server: Some(server),
        user: args.rpc_user.clone().or(file.rpcuser),
        pass: args.rpc_pass.clone().or(file.rpcpass),
        ca_cert: rpc_cert,
        client_cert,
        client_key,
        proxy: args.proxy.clone().or(file.proxy).filter(|p| !p.is_empty()),
        proxy_user: args.proxy_user.clone().or(file.proxyuser),
        proxy_pass: args.proxy_pass.clone().or(file.proxypass),
        auth_type,
        agent,
    };
    tracing::debug!(?transport, ?timeout, "resolved configuration");
    Ok(Settings { transport, timeout })
}

fn default_rpc_cert(dirs: &AppDirs, wallet: bool) -> Option<PathBuf> {
    if wallet {
        let path = dirs.wallet.join(CERT_FILE_NAME);
        if path.is_file() {
            return Some(path);
        }
    }
    let path = dirs.chain.join(CERT_FILE_NAME);
    path.is_file().then_some(path)
}

/// Port used when the server URL does not name one.
pub fn default_port(wallet: bool, testnet: bool, simnet: bool) -> u16 {
    match (wallet, testnet, simnet) {
        (false, true, _) => 19109,
        (false, _, true) => 19556,
        (false, _, _) => 9109,
        (true, true, _) => 19110,
        (true, _, true) => 19557,
        (true, _, _) => 9110,
    }
}

/// Parse `raw` as a server URL, prefixing `wss://` when no scheme is given
/// and filling in `port` when the authority has none.
pub fn normalize_server(raw: &str, port: u16) -> Result<Url> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("wss://{raw}")
    };
    let mut url =
        Url::parse(&with_scheme).with_context(|| format!("invalid server URL {raw:?}"))?;
    // Url hides ports equal to the scheme default, so look at the text.
    if !has_explicit_port(&with_scheme) {
        url.set_port(Some(port))
            .map_err(|()| anyhow!("server URL {raw:?} cannot carry a port"))?;
    }
    Ok(url)
}

fn has_explicit_port(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let after_host = match host_port.rfind(']') {
        Some(i) => &host_port[i + 1..],
        None => host_port,
    };
    after_host.contains(':')
}
