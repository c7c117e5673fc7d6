use mortgage_scenario_core::MortgageError;
use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a typed request from stdin when JSON is being piped in.
///
/// Returns `None` for an interactive terminal or an empty pipe, so commands
/// fall back to their flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, MortgageError> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| MortgageError::Serialization(format!("Failed to read stdin: {e}")))?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, MortgageError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    tracing::debug!(bytes = trimmed.len(), "reading request from stdin");
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| MortgageError::Serialization(format!("stdin: {e}")))
}
