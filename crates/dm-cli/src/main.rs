//! dbmigrate CLI - apply versioned SQL migration scripts to a database

use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{init, status, update};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Update(args) => update::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Init(args) => init::execute(args, &cli.global),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<commands::common::ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
