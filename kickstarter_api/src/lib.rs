//! Client for Kickstarter project pages.
//!
//! Fetches a project's description page and decodes the project blob the
//! page embeds in an inline script.

mod client;
mod errors;
pub mod extract;
pub mod types;
mod user_agent;
pub use self::client::{Client, DEFAULT_TIMEOUT};
pub use self::errors::{Error, ErrorKind};
pub use self::extract::html_to_project;
