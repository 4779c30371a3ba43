//! Error types shared by the registry, the fetcher and the presenter.

use std::fmt;

use thiserror::Error;

use crate::Record;

/// Outcome of one fetch: the normalized records or the classified failure.
pub type FetchResult = Result<Vec<Record>, FetchError>;

/// Profile resolution errors. Raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown API profile '{name}'. Choose from: {}", available.join(", "))]
    UnknownProfile { name: String, available: Vec<String> },
}

impl RegistryError {
    pub fn unknown_profile(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownProfile {
            name: name.into(),
            available,
        }
    }
}

/// A classified fetch failure.
///
/// Every variant carries a message fit for direct display; [`FetchError::kind`]
/// gives callers a tag to branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out after {timeout_ms}ms. Please check your internet connection.")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Failed to connect to {url}: {message}. Please check your internet connection.")]
    ConnectionFailure { url: String, message: String },

    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to parse JSON response: {message}")]
    Parse { message: String },

    #[error("Unexpected response shape: {message}")]
    MalformedResponse { message: String },
}

/// Tag for [`FetchError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Timeout,
    ConnectionFailure,
    HttpStatus(u16),
    Parse,
    MalformedResponse,
}

impl FetchError {
    pub fn timeout(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            timeout_ms,
        }
    }

    pub fn connection_failure(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout { .. } => FetchErrorKind::Timeout,
            FetchError::ConnectionFailure { .. } => FetchErrorKind::ConnectionFailure,
            FetchError::HttpStatus { status, .. } => FetchErrorKind::HttpStatus(*status),
            FetchError::Parse { .. } => FetchErrorKind::Parse,
            FetchError::MalformedResponse { .. } => FetchErrorKind::MalformedResponse,
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Timeout => write!(f, "timeout"),
            FetchErrorKind::ConnectionFailure => write!(f, "connection failure"),
            FetchErrorKind::HttpStatus(status) => write!(f, "HTTP status {status}"),
            FetchErrorKind::Parse => write!(f, "parse error"),
            FetchErrorKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Why a single record could not be rendered. Never aborts a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing required field '{label}' ({path})")]
    Missing { label: String, path: String },

    #[error("field '{label}' ({path}) is malformed: expected {expected}, found {found}")]
    Malformed {
        label: String,
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}
