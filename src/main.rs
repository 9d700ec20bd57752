//! Domino Beam entry point
//!
//! Parses arguments, runs the command and maps the result to an exit code.

use std::process::ExitCode;

use domino_beam::cli::{self, Args, EXIT_ERROR};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Domino Beam {} starting...", env!("CARGO_PKG_VERSION"));

    let code = match Args::parse().and_then(|args| cli::execute(&args.command)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            if !err.is_fault() {
                eprintln!("run 'domino-beam help' for usage");
            }
            EXIT_ERROR
        }
    };
    ExitCode::from(code as u8)
}
