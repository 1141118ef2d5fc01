//! phctl - toggle Pi-hole DNS blocking from the command line.
//!
//! Reads `[auth] app_password` and `[pihole] url` from `config.ini`, signs in
//! to the Pi-hole API and either pauses blocking for a number of minutes or
//! turns it back on.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use phctl_core::control::{self, Action, Outcome};
use phctl_core::Config;

/// Config file looked up in the working directory unless `--config` is given
const DEFAULT_CONFIG_FILE: &str = "config.ini";

#[derive(Parser, Debug)]
#[command(name = "phctl", version, about = "Control Pi-hole blocking.")]
#[command(group(ArgGroup::new("action").required(true).args(["disable", "enable"])))]
struct Cli {
    /// Disable Pi-hole for MINUTES
    #[arg(short, long, value_name = "MINUTES", allow_negative_numbers = true)]
    disable: Option<i64>,

    /// Re-enable Pi-hole blocking
    #[arg(short, long)]
    enable: bool,

    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Skip TLS certificate verification (self-signed appliance certificates)
    #[arg(long)]
    insecure: bool,

    /// Log requests to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise warn, or debug for our crates with --verbose
    let default = if verbose {
        "warn,phctl=debug,phctl_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: &Cli) -> Result<Outcome> {
    let action = Action::from_selector(cli.disable, cli.enable)?;

    let mut config = Config::load(&cli.config).map_err(phctl_core::Error::from)?;
    if cli.insecure {
        config.verify_tls = false;
    }
    debug!(?config, "Loaded configuration");

    Ok(control::run(&config, action).await?)
}

/// Error message followed by every cause not already part of it
fn describe(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

/// Print an error and any upstream response body
fn report(out: &mut impl Write, err: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "Error: {}", describe(err))?;
    if let Some(body) = err
        .downcast_ref::<phctl_core::Error>()
        .and_then(phctl_core::Error::response_body)
    {
        writeln!(out, "Response: {body}")?;
    }
    Ok(())
}

/// Print the outcome or the error; returns whether the run succeeded
fn finish(result: Result<Outcome>, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<bool> {
    match result {
        Ok(outcome) => {
            writeln!(stdout, "{outcome}")?;
            Ok(true)
        }
        Err(err) => {
            report(stderr, &err)?;
            Ok(false)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Usage errors exit here, before any config or network activity
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    info!(config = %cli.config.display(), "phctl starting");

    let result = run(&cli).await;
    match finish(result, &mut io::stdout(), &mut io::stderr()) {
        Ok(true) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
