//! formsync CLI entry point
//!
//! Parses arguments, dispatches through `cli::run`, prints errors to
//! stderr and exits non-zero on failure. Configuration loading and the
//! HTTP runtime live in the CLI module.

use formsync::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
