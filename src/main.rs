mod civet;
mod cli;
mod commands;
mod error;
mod loris;
mod model;
mod run_log;
mod runner;
mod settings;
mod stages;
mod status;
mod subjects;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;

    match cli.command {
        Commands::Settings(args) => commands::settings::run(&global, args),
        Commands::Subjects(args) => commands::subjects::run(&global, args),
        Commands::Civet(args) => commands::civet::run(&global, args),
        Commands::Run(args) => commands::run::run(&global, args),
        Commands::Status(args) => commands::status::run(&global, args),
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
