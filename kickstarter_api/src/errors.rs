//! Error types for the page client.

use reqwest::StatusCode;

/// Errors that can occur while fetching a project page and extracting its
/// embedded data.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be completed (network error, timeout, TLS...).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("could not get the project description, got HTTP response {status}: \"{reason}\"")]
    HttpStatus { status: u16, reason: String },
    /// The response body could not be handled as an HTML document.
    #[error("parse error: {0}")]
    Parse(String),
    /// No inline script carries the project data assignment.
    #[error("missing project data in page")]
    MissingPayload,
    /// The embedded blob is not valid JSON once HTML entities are decoded.
    #[error("invalid project data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Extraction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Parse => "parse",
            Self::Extraction => "extraction",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Request(_) | Self::HttpStatus { .. } => ErrorKind::Fetch,
            Self::Parse(_) => ErrorKind::Parse,
            Self::MissingPayload | Self::Json(_) => ErrorKind::Extraction,
        }
    }

    /// Whether the same request may succeed if tried again later.
    ///
    /// Only transport failures, 429 and 5xx qualify. A page that is served but
    /// has the wrong shape will not fix itself.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::HttpStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }
}
