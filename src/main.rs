mod app;
mod cli;
mod config;
mod consts;
mod error;
mod generator;
mod notify;
mod output;
mod prompt;
mod recorder;
mod utils;

use clap::Parser;

use cli::Cli;
use config::RunConfig;

fn main() {
    let cli = Cli::parse();

    // Logging needs the resolved log directory, so config errors go straight to stderr.
    let config = match RunConfig::from_process(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // The wrapper's exit code mirrors the generator's.
    let code = match app::execute(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                tracing::error!("{e}");
            } else {
                eprintln!("Error: {e}");
            }
            1
        }
    };
    std::process::exit(code);
}
