//! `invx` - export invoice items and enriched products as CSV/TSV.

mod cli;
mod commands;
mod input;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(notice) = commands::empty_input(&err) {
                log::info!("nothing exported");
                eprintln!("{}", notice);
                return ExitCode::SUCCESS;
            }
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default `warn` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
