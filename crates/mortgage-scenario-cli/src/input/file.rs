use mortgage_scenario_core::config::RateTable;
use mortgage_scenario_core::MortgageError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load a rate table from YAML (`.yaml`/`.yml`) or JSON and validate it.
pub fn read_rate_table(path: &str) -> Result<RateTable, MortgageError> {
    let canonical = resolve_path(path).map_err(|e| MortgageError::Config(e.to_string()))?;
    let contents = fs::read_to_string(&canonical).map_err(|e| {
        MortgageError::Config(format!("Failed to read '{}': {}", canonical.display(), e))
    })?;

    let is_yaml = canonical
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let table: RateTable = if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| {
            MortgageError::Config(format!("Failed to parse '{}': {}", canonical.display(), e))
        })?
    } else {
        serde_json::from_str(&contents).map_err(|e| {
            MortgageError::Config(format!("Failed to parse '{}': {}", canonical.display(), e))
        })?
    };

    table
        .validate()
        .map_err(|e| MortgageError::Config(format!("{}: {}", canonical.display(), e)))?;
    tracing::debug!(path = %canonical.display(), "loaded rate table");
    Ok(table)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
