//! Search index error types.
//!
//! This module defines the unified error type for all search service operations,
//! including transport failures and classified HTTP error responses.

use thiserror::Error;

/// Unified errors from search service operations.
///
/// Used by the `SearchCollectionProvider` trait for every call. HTTP error responses are
/// classified by [`SearchIndexError::from_response`] so callers can match on the
/// condition (not found, already exists, unauthorized) instead of inspecting messages.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., unusable node settings).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search service on every configured node.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested collection or resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),

    /// The resource already exists (HTTP 409 or a duplicate message).
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The API key is rejected or lacks permission (HTTP 401/403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-success HTTP response.
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Failed to parse a response from the search service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search service.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Classify a non-success HTTP response.
    ///
    /// `body` is the raw response body; when it is a JSON object with a `message`
    /// field that message is used, otherwise the body text itself.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        let lowered = message.to_lowercase();
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            404 => Self::NotFound(message),
            409 => Self::AlreadyExists(message),
            _ if lowered.contains("already exists") || lowered.contains("duplicate") => {
                Self::AlreadyExists(message)
            }
            _ => Self::RequestFailed { status, message },
        }
    }

    /// Returns true for a missing collection or resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true when the resource was already present.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// Returns true when the API key was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true when another node may succeed where this one failed.
    pub(crate) fn is_retryable_on_next_node(&self) -> bool {
        match self {
            Self::ConnectionError(_) => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SearchIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_uses_body_message() {
        let err = SearchIndexError::from_response(404, r#"{"message": "Not Found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not Found: Not Found");
    }

    #[test]
    fn test_conflict_is_already_exists() {
        let err = SearchIndexError::from_response(
            409,
            r#"{"message": "A collection with name `gog_games` already exists."}"#,
        );
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_duplicate_message_is_already_exists() {
        let err = SearchIndexError::from_response(400, r#"{"message": "Duplicate collection"}"#);
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_unauthorized_statuses() {
        for status in [401, 403] {
            let err = SearchIndexError::from_response(status, r#"{"message": "Forbidden"}"#);
            assert!(err.is_unauthorized(), "status {} should be unauthorized", status);
        }
    }

    #[test]
    fn test_plain_text_body() {
        let err = SearchIndexError::from_response(500, "  upstream exploded \n");
        match err {
            SearchIndexError::RequestFailed { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_retryable_on_next_node() {
        assert!(SearchIndexError::connection("refused").is_retryable_on_next_node());
        assert!(SearchIndexError::from_response(503, "").is_retryable_on_next_node());
        assert!(!SearchIndexError::from_response(404, "").is_retryable_on_next_node());
        assert!(!SearchIndexError::from_response(400, "bad").is_retryable_on_next_node());
    }
}
