use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MortgageError {
    /// Shorthand for the common field-level validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MortgageError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending input field, if this is a validation failure.
    pub fn field(&self) -> Option<&str> {
        match self {
            MortgageError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::Serialization(e.to_string())
    }
}
