use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};

mod cmd;
mod config;
mod error;
mod registry;
mod rpc;
mod utils;

use config::ConfigArgs;
use error::CtlError;
use rpc::{CallContext, Caller};

/// dcrctl - issue a single JSON-RPC command to a chain or wallet daemon
///
/// Usage:
///   dcrctl [OPTIONS] <command> [args...]
///
/// Arguments are coerced to the method's parameter types. A lone `-` reads
/// that argument from the next line of stdin.
///
/// Transport:
///   WSRPC_AGENT     Unix socket of a connection agent; used unless --proxy is set
///   otherwise a websocket is dialed to --server (TLS for wss://)
///
/// Examples:
///   dcrctl getblockcount
///   dcrctl getblock 000000000000...e3a false
///   dcrctl --wallet getbalance default 0
///   echo "DsExampleAddr" | dcrctl --wallet validateaddress -
///   dcrctl -l
#[derive(Parser, Debug)]
#[command(
    name = "dcrctl",
    version,
    author,
    about = "Control client for chain and wallet RPC servers"
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long)]
    quiet: bool,

    /// List all of the supported commands and exit
    #[arg(short = 'l', long)]
    list: bool,

    #[command(flatten)]
    config: ConfigArgs,

    /// RPC method followed by its parameters
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    if cli.list {
        print!("{}", cmd::list_commands());
        return;
    }

    if cli.command.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "missing command parameter; specify -l to list available commands",
            )
            .exit();
    }

    if let Err(e) = run(&cli) {
        report(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let Some((method, tokens)) = cli.command.split_first() else {
        return Ok(());
    };
    let descriptor = cmd::resolve(method)?;
    let args = cmd::materialize(tokens, &mut std::io::stdin().lock())?;
    let request = cmd::encode(&descriptor, &args)?;

    let settings = config::resolve(&cli.config)?;
    tracing::debug!(
        method = descriptor.name(),
        namespace = %descriptor.namespace(),
        flags = ?descriptor.flags(),
        "encoded request"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async {
        let ctx = CallContext::new(settings.timeout).with_interrupt();
        let mut transport = rpc::connect(&settings.transport, &ctx).await?;
        let mut out = None;
        transport
            .call(&ctx, &request.method, &mut out, &request.params)
            .await?;
        Ok::<_, CtlError>(out)
    })?;

    if let Some(raw) = result {
        print!("{}", cmd::render(raw.get())?);
    }
    Ok(())
}

/// Print the error, plus usage text or a listing hint where it helps.
fn report(err: &anyhow::Error) {
    let Some(e) = err.downcast_ref::<CtlError>() else {
        eprintln!("{err:#}");
        return;
    };
    eprintln!("{e}");
    if let CtlError::InvalidArguments { method, .. } = e
        && e.wants_usage()
        && let Some(usage) = cmd::resolve(method).ok().and_then(|d| d.usage_text())
    {
        eprintln!("Usage:\n  {usage}");
    }
    if let CtlError::UnknownCommand(_) = e {
        eprintln!("Specify -l to list available commands");
    }
}
