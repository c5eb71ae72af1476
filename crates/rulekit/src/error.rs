//! Error types for rule decoding.
//!
//! Canonicalization and merging are total; only reading rules back from
//! their declared field-map form can fail.

use thiserror::Error;

/// Errors that can occur while decoding declared rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A port entry is neither a number nor a `low-high` range.
    #[error("invalid port specification: {value}")]
    InvalidPort {
        /// The offending entry as written
        value: String,
    },

    /// A required field is missing.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// A field is present but has the wrong shape.
    #[error("invalid field {field}: {message}")]
    InvalidField {
        /// Name of the field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

/// Result type for rule decoding.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidPort {
            value: "80-x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid port specification: 80-x");

        let err = Error::MissingField { field: "protocol" };
        assert_eq!(err.to_string(), "missing required field: protocol");

        let err = Error::invalid_field("subnets", "expected an array");
        assert_eq!(err.to_string(), "invalid field subnets: expected an array");
    }
}
