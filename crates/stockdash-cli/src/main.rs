mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::commands::Outcome;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(exit_code = error.exit_code(), "command failed");
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match commands::run(&cli).await? {
        Outcome::Render(envelope) => output::render(&envelope, cli.format, cli.pretty),
        Outcome::Served => Ok(()),
    }
}
