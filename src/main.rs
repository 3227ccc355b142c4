//! mechdb CLI entry point.
//!
//! Parses arguments, runs the requested command against the store, and
//! maps error kinds to stable exit codes (see `commands::exit_code`).

use clap::Parser;

use mechdb::commands::{self, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(commands::exit_code(&err));
    }
}
