//! # Response Body Helpers
//!
//! Turning raw response bodies into JSON or into readable failure text.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Longest body excerpt carried in an error message, in characters.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Message for a non-success status: the reason phrase, then a body excerpt
/// when the server sent one.
///
/// # Example
/// ```rust
/// use apifetch_util::http::status_error_message;
/// use reqwest::StatusCode;
///
/// assert_eq!(status_error_message(StatusCode::INTERNAL_SERVER_ERROR, ""), "Internal Server Error");
///
/// let message = status_error_message(StatusCode::TOO_MANY_REQUESTS, "{\"error\":\"slow down\"}");
/// assert_eq!(message, "Too Many Requests ({\"error\":\"slow down\"})");
/// ```
pub fn status_error_message(status: StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    match body_preview(body, BODY_PREVIEW_CHARS) {
        Some(preview) => format!("{reason} ({preview})"),
        None => reason.to_string(),
    }
}

/// Decode a successful response body as JSON.
///
/// An empty body is a decode failure like any other.
///
/// # Errors
/// [`BodyParseError`] carrying the status and a short excerpt of the body.
pub fn parse_json_body(body: &str, status: StatusCode) -> Result<Value, BodyParseError> {
    serde_json::from_str(body).map_err(|source| BodyParseError {
        status,
        preview: body_preview(body, BODY_PREVIEW_CHARS).unwrap_or_else(|| "<empty>".to_string()),
        source,
    })
}

/// Collapse whitespace runs to single spaces and cut the text at `max_chars`.
/// `None` for a blank body.
pub fn body_preview(body: &str, max_chars: usize) -> Option<String> {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => Some(format!("{}...", &collapsed[..cut])),
        None => Some(collapsed),
    }
}

#[derive(Debug, Error)]
#[error("{source} (HTTP {status}); body: {preview}")]
pub struct BodyParseError {
    status: StatusCode,
    preview: String,
    #[source]
    source: serde_json::Error,
}

impl BodyParseError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }
}
