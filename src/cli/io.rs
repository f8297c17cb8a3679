//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON document on stdout, newline-terminated

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Read one JSON document from stdin
pub fn read_input<T: DeserializeOwned>() -> CliResult<T> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_input(&input)
}

fn parse_input<T: DeserializeOwned>(input: &str) -> CliResult<T> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write one JSON document to stdout
pub fn write_output<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
