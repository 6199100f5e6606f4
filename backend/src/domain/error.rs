//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses, CLI exit codes, or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The record exists but the caller may not see or change it.
    Forbidden,
    /// The requested record does not exist.
    NotFound,
    /// A dependency such as the employee store is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Forbidden => "access denied",
            Self::NotFound => "not found",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use personnel::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "DomainErrorDto", into = "DomainErrorDto")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl DomainError {
    /// Create a new error.
    ///
    /// A blank message is replaced by a generic one for the code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    ///
    /// # Errors
    ///
    /// Returns [`DomainErrorValidationError::EmptyMessage`] for a blank
    /// message.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, DomainErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use personnel::domain::{DomainError, ErrorCode};
    /// use serde_json::json;
    ///
    /// let err = DomainError::new(ErrorCode::Forbidden, "hidden")
    ///     .with_details(json!({ "reason": "direction_mismatch" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<DomainError> for DomainErrorDto {
    fn from(value: DomainError) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<DomainErrorDto> for DomainError {
    type Error = DomainErrorValidationError;

    fn try_from(value: DomainErrorDto) -> Result<Self, Self::Error> {
        let DomainErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Self::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
