//! xwalk - Render and watch the crosswalk lanes from the command line

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crosswalk::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose > 0 { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli)
}
