#![deny(missing_docs)]

//! # oasprobe CLI
//!
//! Offline front-end to the oasprobe core.
//!
//! Supported Commands:
//! - `validate`: Checks that a document is an importable OpenAPI 3.x document.
//! - `extract`: Prints the endpoint definitions of a document.
//! - `test`: Calls one operation of a document against a base URL.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod error;
mod extract;
mod invoke;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI endpoint extraction and test runner")]
struct Cli {
    /// `env_logger` filter directive.
    #[clap(long, env = "OASPROBE_LOG", default_value = "warn", global = true)]
    log: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validates an OpenAPI document.
    Validate(validate::ValidateArgs),
    /// Extracts endpoint definitions as JSON.
    Extract(extract::ExtractArgs),
    /// Test-invokes one operation.
    Test(invoke::InvokeArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .parse_filters(&cli.log)
        .try_init()
        .ok();

    match &cli.command {
        Commands::Validate(args) => validate::execute(args)?,
        Commands::Extract(args) => extract::execute(args)?,
        Commands::Test(args) => invoke::execute(args)?,
    }

    Ok(())
}
