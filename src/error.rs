use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a piece of client input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    Missing,
    Empty,
    TooLong,
    BadLength,
    BadFormat,
    EmptyBatch,
    TooManyItems,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::Missing => "missing",
            ValidationReason::Empty => "empty",
            ValidationReason::TooLong => "too_long",
            ValidationReason::BadLength => "bad_length",
            ValidationReason::BadFormat => "bad_format",
            ValidationReason::EmptyBatch => "empty_batch",
            ValidationReason::TooManyItems => "too_many_items",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client input that failed validation, with a human readable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub reason: ValidationReason,
    pub message: String,
}

impl ValidationError {
    pub fn new(reason: ValidationReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

/// Closed set of failures a translation attempt can end in
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Target language '{0}' is not supported")]
    UnsupportedLanguage(String),

    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Bad response from translation service: {0}")]
    BadResponse(String),

    #[error("Translation service error: {details}")]
    Upstream { details: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TranslateError {
    /// Short machine-friendly name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::Validation(_) => "validation",
            TranslateError::UnsupportedLanguage(_) => "unsupported_language",
            TranslateError::ServiceUnavailable(_) => "service_unavailable",
            TranslateError::BadResponse(_) => "bad_response",
            TranslateError::Upstream { .. } => "upstream",
            TranslateError::Internal(_) => "internal",
        }
    }
}
