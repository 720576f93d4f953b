//! CLI entry point (spec.md §6 "CLI surface"): reads one file, runs it
//! through [`glint::interpret`], exits `0` on success and `1` on failure.
//!
//! Grounded on the teacher's `src/bin/why.rs`: `clap` derive for argument
//! parsing, `simple_logger` initialized at `Warn` by default.

use clap::Parser as ClapParser;
use log::error;
use std::io::{self, BufReader};
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Script file to run.
    file: std::path::PathBuf,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).expect("logger already initialized");

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            error!("could not read '{}': {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut input = BufReader::new(io::stdin());
    let mut output = io::stdout();

    match glint::interpret(&source, &mut output, &mut input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
