//! Command output. Results go to stdout as pretty JSON; logs go to stderr.

#![allow(clippy::print_stdout)]

use serde::Serialize;

use crate::error::CliError;

/// Print `value` as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a single human-readable line.
pub fn line(message: impl std::fmt::Display) {
    println!("{message}");
}
