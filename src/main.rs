mod cli;
mod config;
mod convert;
mod logging;
mod match_cmd;
mod pipeline;
mod select_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Match(args) => match_cmd::run(args),
        Command::Select(args) => select_cmd::run(args),
    }
}
