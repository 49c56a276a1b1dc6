//! Error types for Echo Link

use thiserror::Error;

/// Core Echo Link errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EchoError {
    /// Malformed sizes, non-finite values, empty inputs or a bad header
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transmitter and receiver disagree on the packet layout
    #[error("Configuration mismatch: {field} expected {expected}, got {actual}")]
    ConfigurationMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl EchoError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EchoError::InvalidInput(msg.into())
    }

    /// True for errors caused by the caller's data rather than configuration
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EchoError::InvalidInput(_))
    }
}

/// Result type for Echo Link operations
pub type EchoResult<T> = Result<T, EchoError>;

/// Reject the first non-finite value in `values`
pub fn ensure_finite(what: &str, values: &[f32]) -> EchoResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(EchoError::InvalidInput(format!(
            "{} contains non-finite value {} at index {}",
            what, values[idx], idx
        ))),
        None => Ok(()),
    }
}
