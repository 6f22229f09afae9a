//! # Error Types
//!
//! Structured errors for the ComplAI domain layer. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for the domain layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Identifier or field validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Bulk import row could not be transformed.
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when a value does not match its expected format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// PAN does not match the income-tax format (AAAAA9999A).
    #[error("invalid PAN: \"{0}\" (expected 5 letters, 4 digits, 1 letter)")]
    InvalidPan(String),

    /// TAN does not match the TDS deductor format (AAAA99999A).
    #[error("invalid TAN: \"{0}\" (expected 4 letters, 5 digits, 1 letter)")]
    InvalidTan(String),

    /// GSTIN does not match the 15-character GST registration format.
    #[error("invalid GSTIN: \"{0}\" (expected 2-digit state code, PAN, entity code, 'Z', checksum)")]
    InvalidGstin(String),

    /// CIN does not match the 21-character MCA corporate identity format.
    #[error("invalid CIN: \"{0}\" (expected 21 characters, e.g. U72900KA2019PTC123456)")]
    InvalidCin(String),

    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A quantity that must be zero or more was negative (or not a number).
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// An enumerated field carried an unrecognised value.
    #[error("unknown {field} \"{value}\"")]
    UnknownVariant {
        /// Field name (e.g. `status`).
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Errors while converting an uploaded spreadsheet row into a task payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The row is missing a column that has no default.
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    /// A cell value could not be interpreted.
    #[error("invalid value for \"{column}\": {reason}")]
    InvalidCell {
        /// Column name.
        column: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The uploaded file could not be read as a sheet at all.
    #[error("unreadable sheet: {0}")]
    Sheet(String),
}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField(column) => Self::MissingColumn(column),
            ValidationError::UnknownVariant { field, value } => Self::InvalidCell {
                column: field,
                reason: format!("unrecognised value \"{value}\""),
            },
            ValidationError::Negative(field) => Self::InvalidCell {
                column: field,
                reason: "must not be negative".to_string(),
            },
            other => Self::InvalidCell {
                column: "identifier",
                reason: other.to_string(),
            },
        }
    }
}
