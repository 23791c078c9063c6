//! # req Entry Point
//!
//! Reads the environment and arguments, sends one request and prints the
//! response. Any failure prints its message and exits 1.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use req::config::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use req::{execute, parse_args, Defaults, Draft, FsAttachments, USAGE};
use reqwest::blocking::Client;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("request failed: {e:?}");
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let defaults = Defaults::from_env()?;
    let mut draft = Draft::new(&defaults);
    parse_args(args, &mut draft)?;

    let client = Client::builder().build()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(draft, &FsAttachments, &client, &mut out)?;
    Ok(())
}

// Logs go to stderr; stdout carries only the response.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();
}
