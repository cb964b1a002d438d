use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let ok = commands::run_command(cli, &mut io::stdout().lock())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
