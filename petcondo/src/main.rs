//! `petcondo` entry point: parses the command, wires the hosted adapters and
//! prints the rendered result.

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use petcondo::config::Settings;
use petcondo::inbound::cli::{Cli, messages, render, run};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = Settings::load().wrap_err("load petcondo settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;

    match runtime.block_on(run(&cli, &settings)) {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{}", render::message(&messages::for_command_error(&err)));
            Ok(ExitCode::FAILURE)
        }
    }
}
