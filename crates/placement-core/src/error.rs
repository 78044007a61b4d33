//! API error types.
//!
//! These error types represent failures when talking to the content API or
//! the media-upload service. Defined in `placement-core` so the scan engine
//! and the CLI can classify errors without string matching.

use thiserror::Error;

use crate::validation::FieldError;

/// Errors that can occur when calling the content API or the upload service.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No token, or the token was rejected (HTTP 401).
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// The token is valid but lacks permission (HTTP 403).
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// The requested entity does not exist (HTTP 404).
    #[error("{0} not found")]
    NotFound(String),

    /// The payload was rejected, either locally or by the server (HTTP 400).
    #[error("validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The API returned any other error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The media-upload service rejected the file.
    #[error("upload failed: {0}")]
    Upload(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

fn describe_fields(fields: &[FieldError]) -> String {
    if fields.is_empty() {
        return "request rejected".to_string();
    }
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Returns `true` if repeating the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized(_)
                | ApiError::Forbidden(_)
                | ApiError::NotFound(_)
                | ApiError::Validation(_)
        )
    }

    /// Returns `true` if the user has to log in (again) before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ApiError::Unauthorized("expired".into()).requires_login());
        assert!(ApiError::NotFound("test 3".into()).is_permanent());
        assert!(!ApiError::Timeout(30).is_permanent());
        assert!(!ApiError::Network("reset".into()).requires_login());
        assert_eq!(
            ApiError::RateLimited {
                retry_after_ms: 2000
            }
            .retry_after_ms(),
            Some(2000)
        );
    }

    #[test]
    fn validation_message_lists_fields() {
        let err = ApiError::Validation(vec![
            FieldError::new("title", "is required"),
            FieldError::new("options", "needs a correct answer"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("title: is required"));
        assert!(msg.contains("options: needs a correct answer"));
    }
}
