// Entrypoint for the CLI application.
// - Keeps `main` small: resolve the secret key, build the orchestrator and
//   hand the parsed operation to it.
// - The orchestrator converts every failure into an exit code, so nothing
//   escapes uncaught.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use gistctl::cli::{Cli, SECRET_KEY_ENV};
use gistctl::client::HttpTransport;
use gistctl::ops::{Config, Orchestrator};

fn main() -> anyhow::Result<ExitCode> {
    // Invoked with no arguments at all: print usage and fail, instead of
    // letting the parser pick a default operation.
    if env::args().len() < 2 {
        Cli::command().print_help().context("failed to render usage")?;
        return Ok(ExitCode::FAILURE);
    }

    let cli = Cli::parse();
    let (operation, secret_key, no_logging) = cli.into_parts();
    let secret_key = secret_key.or_else(|| env::var(SECRET_KEY_ENV).ok());

    let config = Config::cli(secret_key, !no_logging);
    let transport = HttpTransport::new(config.secret_key.clone())?;
    let mut orchestrator = Orchestrator::new(transport, config);
    Ok(orchestrator.run(operation))
}
