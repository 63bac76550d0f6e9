//! spamcheck CLI binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use spamcheck::cli::{args::SpamcheckArgs, commands::execute_command};

fn main() -> anyhow::Result<ExitCode> {
    let args = SpamcheckArgs::parse();

    init_tracing(args.verbosity());

    let config = args.config.clone();
    execute_command(args).with_context(|| match config {
        Some(path) => format!("spamcheck failed (config {})", path.display()),
        None => "spamcheck failed".to_string(),
    })
}

/// Log to stderr so that stdout carries only command output. `RUST_LOG`
/// overrides the level chosen by the verbosity flags.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spamcheck={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
