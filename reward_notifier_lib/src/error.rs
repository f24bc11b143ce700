//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping page client errors and
/// adding data-shape and input validation failures.
#[derive(Debug)]
pub enum RewardNotifierError {
    /// Fetching or extracting the project page failed.
    Api(kickstarter_api::Error),
    /// The page data lacks a field the catalog needs, or has the wrong shape.
    MalformedData(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for RewardNotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::MalformedData(msg) => write!(f, "Malformed project data: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RewardNotifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<kickstarter_api::Error> for RewardNotifierError {
    fn from(e: kickstarter_api::Error) -> Self {
        Self::Api(e)
    }
}
