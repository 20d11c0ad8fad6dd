//! Error type for configuration input.

use thiserror::Error;

/// Errors raised while reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in the input file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The same item appears twice in one block
    #[error("Item [{block}] {item} defined more than once (line {line})")]
    Duplicate {
        block: String,
        item: String,
        line: usize,
    },

    /// Required item not present
    #[error("Item [{block}] {item} not found")]
    Missing { block: String, item: String },

    /// Item present but its value does not parse as the requested type
    #[error("Value \"{value}\" of item [{block}] {item} is not of type {expected}")]
    InvalidValue {
        block: String,
        item: String,
        value: String,
        expected: &'static str,
    },

    /// Parameter combination that cannot be run
    #[error("Incompatible configuration: {0}")]
    Incompatible(String),
}

impl ConfigError {
    /// Create an incompatible-configuration error.
    pub fn incompatible(message: impl Into<String>) -> Self {
        Self::Incompatible(message.into())
    }
}
