// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;

use anyhow::{Context, Result};
use clap::Parser;
use include_vars_dir::YamlLoader;
use std::process::ExitCode;

use self::cli::Cli;
use self::config::resolve_task;
use self::formatter::OutputGenerator;

/// Builds a task from the command line, runs it, and prints the result the
/// way a host would receive it.
pub fn run() -> Result<ExitCode> {
    let args = Cli::parse();
    let format = args.format;

    let task = resolve_task(args)?;

    let result = include_vars_dir::run(&task, &YamlLoader).context("Invalid task arguments")?;

    println!("{}", OutputGenerator::render(&result, format)?);

    Ok(if result.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
