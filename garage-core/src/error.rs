//! Error types for garage core operations

use thiserror::Error;

/// Errors raised while interpreting server payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Response is missing the '{field}' collection")]
    MissingCollection { field: &'static str },

    #[error("Server reported failure: {message}")]
    ServerFailure { message: String },

    #[error("Failed to decode {resource}: {reason}")]
    Decode {
        resource: &'static str,
        reason: String,
    },
}

/// Client-side validation failures, resolved without a network round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Email addresses do not match")]
    EmailMismatch,
}

pub type CoreResult<T> = Result<T, CoreError>;
