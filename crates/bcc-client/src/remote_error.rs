//! Normalization and classification of coupon-creation failures.
//!
//! The remote API reports errors in several shapes: a plain string body, a
//! JSON document (sometimes with an `errors` field, often a bare array of
//! `{status, message}` objects), or nothing at all when the request never
//! reached it. [`normalize_remote_error`] turns each of those into a single
//! message string; [`ConflictMatcher`] decides whether that message means the
//! code already exists.

use std::fmt;

/// Raw failure as observed by the client, before normalization.
#[derive(Debug, Clone)]
pub enum RawRemoteError {
    /// Response body that parsed as JSON.
    Json(serde_json::Value),
    /// Response body that was not JSON.
    Text(String),
    /// The request failed before a response was received.
    Transport(String),
}

/// Reduces any remote error shape to one message string.
///
/// JSON bodies use their `errors` field when present and non-null, otherwise
/// the whole document. A JSON string is used verbatim; anything else is
/// rendered as compact JSON so substring checks still see the remote text.
#[must_use]
pub fn normalize_remote_error(raw: &RawRemoteError) -> String {
    match raw {
        RawRemoteError::Json(body) => {
            let details = body
                .get("errors")
                .filter(|e| !e.is_null())
                .unwrap_or(body);
            match details {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        }
        RawRemoteError::Text(text) => text.trim().to_string(),
        RawRemoteError::Transport(message) => message.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The code is already taken; retry with a different code.
    Conflict,
    /// The remote rejected the payload for any other reason.
    Validation,
    /// No response was received.
    Transport,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::Conflict => write!(f, "conflict"),
            RemoteErrorKind::Validation => write!(f, "validation"),
            RemoteErrorKind::Transport => write!(f, "transport"),
        }
    }
}

/// A failed create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFailure {
    pub kind: RemoteErrorKind,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    pub message: String,
}

impl CreateFailure {
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == RemoteErrorKind::Conflict
    }
}

impl fmt::Display for CreateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} error (HTTP {status}): {}", self.kind, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for CreateFailure {}

/// Substring rules that identify a duplicate-code rejection.
///
/// The remote API does not expose a stable error code for duplicates on every
/// path, so message text is matched as a fallback after HTTP 409.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictMatcher {
    markers: Vec<String>,
}

impl Default for ConflictMatcher {
    fn default() -> Self {
        Self::new(["already exists", "conflict"])
    }
}

impl ConflictMatcher {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.markers
            .iter()
            .any(|m| !m.is_empty() && message.contains(m.as_str()))
    }

    /// Classifies a failure from its HTTP status (if any) and normalized message.
    #[must_use]
    pub fn classify(&self, status: Option<u16>, message: &str) -> RemoteErrorKind {
        match status {
            None => RemoteErrorKind::Transport,
            Some(409) => RemoteErrorKind::Conflict,
            Some(_) if self.matches(message) => RemoteErrorKind::Conflict,
            Some(_) => RemoteErrorKind::Validation,
        }
    }

    /// Normalizes `raw` and wraps it in a classified [`CreateFailure`].
    #[must_use]
    pub fn failure(&self, status: Option<u16>, raw: &RawRemoteError) -> CreateFailure {
        let message = normalize_remote_error(raw);
        CreateFailure {
            kind: self.classify(status, &message),
            status,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_body_is_used_verbatim() {
        let raw = RawRemoteError::Json(json!("The field 'code' is invalid."));
        assert_eq!(normalize_remote_error(&raw), "The field 'code' is invalid.");
    }

    #[test]
    fn errors_field_string_is_unwrapped() {
        let raw = RawRemoteError::Json(json!({ "errors": "code already exists" }));
        assert_eq!(normalize_remote_error(&raw), "code already exists");
    }

    #[test]
    fn structured_field_errors_are_serialized() {
        let raw = RawRemoteError::Json(json!({
            "errors": { "code": "The coupon code must be unique" }
        }));
        assert_eq!(
            normalize_remote_error(&raw),
            r#"{"code":"The coupon code must be unique"}"#
        );
    }

    #[test]
    fn bare_error_array_is_serialized_whole() {
        let raw = RawRemoteError::Json(json!([
            { "status": 409, "message": "The coupon code 'A' already exists." }
        ]));
        let message = normalize_remote_error(&raw);
        assert!(message.contains("already exists"), "{message}");
        assert!(message.starts_with('['));
    }

    #[test]
    fn null_errors_field_falls_back_to_body() {
        let raw = RawRemoteError::Json(json!({ "errors": null, "title": "Bad Request" }));
        assert_eq!(
            normalize_remote_error(&raw),
            r#"{"errors":null,"title":"Bad Request"}"#
        );
    }

    #[test]
    fn text_and_transport_messages_pass_through() {
        assert_eq!(
            normalize_remote_error(&RawRemoteError::Text("  Bad Gateway \n".to_string())),
            "Bad Gateway"
        );
        assert_eq!(
            normalize_remote_error(&RawRemoteError::Transport(
                "error sending request: connection refused".to_string()
            )),
            "error sending request: connection refused"
        );
    }

    #[test]
    fn status_409_is_conflict_regardless_of_text() {
        let matcher = ConflictMatcher::default();
        assert_eq!(matcher.classify(Some(409), "nope"), RemoteErrorKind::Conflict);
    }

    #[test]
    fn default_markers_detect_duplicates() {
        let matcher = ConflictMatcher::default();
        assert_eq!(
            matcher.classify(Some(400), "coupon code already exists"),
            RemoteErrorKind::Conflict
        );
        assert_eq!(
            matcher.classify(Some(422), "conflict with existing record"),
            RemoteErrorKind::Conflict
        );
        assert_eq!(
            matcher.classify(Some(422), "amount must be positive"),
            RemoteErrorKind::Validation
        );
    }

    #[test]
    fn missing_status_is_transport_even_if_text_matches() {
        let matcher = ConflictMatcher::default();
        assert_eq!(
            matcher.classify(None, "conflict"),
            RemoteErrorKind::Transport
        );
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let matcher = ConflictMatcher::new(["duplicate"]);
        assert!(matcher.matches("duplicate code"));
        assert!(!matcher.matches("already exists"));
    }

    #[test]
    fn empty_markers_never_match() {
        let matcher = ConflictMatcher::new([""]);
        assert!(!matcher.matches("anything"));
    }

    #[test]
    fn failure_combines_normalization_and_classification() {
        let matcher = ConflictMatcher::default();
        let failure = matcher.failure(
            Some(400),
            &RawRemoteError::Json(json!([{ "status": 400, "message": "code already exists" }])),
        );
        assert!(failure.is_conflict());
        assert_eq!(failure.status, Some(400));
        assert!(failure.to_string().contains("HTTP 400"));
    }
}
