//! Common error types for SweetTrack

use std::collections::BTreeMap;

use thiserror::Error;

/// Common result type for SweetTrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Field-level validation failures, keyed by field name
pub type FieldErrors = BTreeMap<String, String>;

/// Common error types across the SweetTrack crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more form fields failed validation
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("phone".to_string(), "Phone number is required".to_string());
        fields.insert("customer_name".to_string(), "Name is required".to_string());

        let message = Error::Validation(fields).to_string();
        assert_eq!(
            message,
            "Validation failed: customer_name: Name is required; phone: Phone number is required"
        );
    }
}
