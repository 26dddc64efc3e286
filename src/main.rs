//! Main entry point for the tarsau CLI

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tarsau::cli::{self, Args, Command};
use tarsau::SauError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run_app(args) {
        eprintln!("Error: {:#}", e);
        if matches!(
            e.downcast_ref::<SauError>(),
            Some(SauError::Usage(_) | SauError::TooManyFiles { .. })
        ) {
            eprintln!("Usage: {}", cli::usage());
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_app(args: Args) -> anyhow::Result<()> {
    let command = args.into_command()?;
    let context = match &command {
        Command::Build { output, .. } => format!("failed to build {}", output.display()),
        Command::Extract { archive, .. } => format!("failed to extract {}", archive.display()),
    };
    cli::run(command).context(context)
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
