//! CLI module for formsync
//!
//! Provides command-line interface for:
//! - serve: HTTP transport for the account workflows
//! - reduce: apply form actions read from stdin
//! - validate: check a payload against a form schema

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, FormKind};
pub use commands::{reduce_input, run, run_command, validate_payload, ReduceInput};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
