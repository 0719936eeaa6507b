//! asn-ips - Collect every IP address announced by an Autonomous System.
//!
//! This is the command-line interface for the asn_ips library.

#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use asn_ips::config::defaults::{
    DEFAULT_OUTPUT, DEFAULT_WHOIS_COMMAND, DEFAULT_WHOIS_HOST, DEFAULT_WHOIS_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};
use asn_ips::{RunConfig, StdinConfirm, WhoisCommand};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Get the version string for asn-ips
fn get_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(env!("CARGO_PKG_VERSION"), "-UNRELEASED")
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Command-line arguments for the collector.
#[derive(Parser, Debug)]
#[clap(author, version = get_version(), about = "Collect all IP addresses for an ASN", long_about = None)]
struct Args {
    /// ASN number (ex: AS8945, AS12345, 8945)
    #[clap(long)]
    asn: String,

    /// Output file name
    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Never ask for user input, use the default behavior
    #[clap(long)]
    batch: bool,

    /// Routing registry queried for route objects
    #[clap(long, default_value = DEFAULT_WHOIS_HOST)]
    whois_host: String,

    /// WHOIS client executable
    #[clap(long, default_value = DEFAULT_WHOIS_COMMAND)]
    whois_command: String,

    /// Timeout for the WHOIS query in seconds
    #[clap(long, default_value_t = DEFAULT_WHOIS_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Number of prefixes expanded concurrently
    #[clap(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Enable verbose logging on stderr (use -vv for debug, -vvv for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log filter used when `RUST_LOG` is not set
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

/// Build the library configuration from parsed arguments
fn build_config(args: &Args) -> Result<RunConfig> {
    let config = RunConfig::builder()
        .asn(&args.asn)
        .output(&args.output)
        .batch(args.batch)
        .whois_host(&args.whois_host)
        .whois_command(&args.whois_command)
        .whois_timeout(Duration::from_secs(args.timeout_secs))
        .workers(args.workers)
        .build()?;
    Ok(config)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // Expansion runs on the blocking pool, so one core thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    match runtime.block_on(async_main(args)) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn async_main(args: Args) -> Result<i32> {
    let config = build_config(&args)?;
    let whois = WhoisCommand::from_config(&config);
    let mut confirm = StdinConfirm::stdin();

    // Lookup failures are already logged by the resolver
    let outcome = asn_ips::run(&config, &whois, &mut confirm).await?;
    Ok(outcome.exit_code())
}
