//! Configuration error types.
//!
//! Chunking itself never fails; invalid configuration is rejected once when
//! it is loaded.

use thiserror::Error;

/// Errors raised while loading or validating a [`ChunkingConfig`](crate::ChunkingConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A lower bound is greater than its upper bound.
    #[error("Inverted bounds in {group}: {lower} > {upper}")]
    InvertedBounds {
        group: &'static str,
        lower: String,
        upper: String,
    },

    /// A value is outside its permitted range.
    #[error("Invalid value for {key}: {value} ({reason})")]
    OutOfRange {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The configuration sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Create an inverted bounds error.
    pub fn inverted(group: &'static str, lower: impl ToString, upper: impl ToString) -> Self {
        Self::InvertedBounds {
            group,
            lower: lower.to_string(),
            upper: upper.to_string(),
        }
    }

    /// Create an out of range error.
    pub fn out_of_range(key: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::OutOfRange {
            key,
            value: value.to_string(),
            reason,
        }
    }
}
