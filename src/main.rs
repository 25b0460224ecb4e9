mod cli;
mod climatology_cmd;
mod config;
mod convert;
mod ensemble_cmd;
mod hazards_cmd;
mod logging;
mod report;
mod seasons_cmd;
mod statistics_cmd;

use std::process;

use anyhow::Result;
use ceres_assess::ErrorPayload;
use clap::Parser;

use crate::cli::{Cli, Command, OutputFormat};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = cli.command.output().format;
    if let Err(e) = run(cli.command) {
        let message = format!("{e:#}");
        let payload = ErrorPayload::new(message.as_str());
        match (format, ceres_assess::to_json(&payload)) {
            (OutputFormat::Json, Ok(json)) => println!("{json}"),
            _ => eprintln!("Error: {message}"),
        }
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Seasons(args) => seasons_cmd::run(args),
        Command::Statistics(args) => statistics_cmd::run(args),
        Command::Hazards(args) => hazards_cmd::run(args),
        Command::Ensemble(args) => ensemble_cmd::run(args),
        Command::Climatology(args) => climatology_cmd::run(args),
    }
}
