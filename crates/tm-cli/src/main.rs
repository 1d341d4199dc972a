//! Tidemark CLI - apply SQL migration scripts exactly once

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{migrate, status};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Migrate => migrate::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// Default to `warn`, or `info` with `--verbose`; `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
