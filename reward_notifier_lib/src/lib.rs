//! Library layer for the Kickstarter reward notifier: reward catalog,
//! watch selection, notifiers and the polling context.
//!
//! Builds on the `kickstarter_api` crate, which fetches project pages and
//! decodes the data they embed.

pub mod alert;
pub mod catalog;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod retry;
pub mod validation;
pub mod watch;

pub use kickstarter_api;
pub use kickstarter_api::types;

pub use alert::Alert;
pub use catalog::{Project, Reward, RewardId};
pub use error::RewardNotifierError;
pub use monitor::{Monitor, PollOutcome, ProjectSource};
pub use notify::{Notifier, NotifierRegistry, NotifyError};
pub use retry::RetryPolicy;
pub use watch::{RewardChoice, RewardChooser, Selection, WatchError, WatchMode, WatchSet};
