//! Error types for notification delivery.

use std::fmt;

use thiserror::Error;

/// Errors from a single notifier, or from the registry as a whole.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("no notifier has been configured")]
    NoneConfigured,
    #[error("invalid value for --{flag}: expected {expected}")]
    InvalidFlag { flag: String, expected: &'static str },
    #[error("{notifier} rejected the message (HTTP {status}): {description}")]
    Rejected {
        notifier: &'static str,
        status: u16,
        description: String,
    },
    #[error("{notifier} network error")]
    Network {
        notifier: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Delivery(#[from] DeliveryFailures),
}

/// A notifier that failed to deliver a message.
#[derive(Debug)]
pub struct ChannelFailure {
    pub notifier: &'static str,
    pub error: NotifyError,
}

impl fmt::Display for ChannelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.notifier, self.error)?;
        let mut source = std::error::Error::source(&self.error);
        while let Some(cause) = source {
            write!(f, ": {}", cause)?;
            source = cause.source();
        }
        Ok(())
    }
}

/// Per-channel failures of one broadcast.
#[derive(Error, Debug)]
#[error("{}/{} notifiers returned an error{}", .failures.len(), .attempted, list_failures(.failures))]
pub struct DeliveryFailures {
    /// Number of configured notifiers the message was sent to.
    pub attempted: usize,
    pub failures: Vec<ChannelFailure>,
}

fn list_failures(failures: &[ChannelFailure]) -> String {
    failures.iter().map(|f| format!("\n- {}", f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_failures_list_every_channel() {
        let err = DeliveryFailures {
            attempted: 2,
            failures: vec![ChannelFailure {
                notifier: "telegram",
                error: NotifyError::Rejected {
                    notifier: "telegram",
                    status: 400,
                    description: "Bad Request: chat not found".into(),
                },
            }],
        };
        assert_eq!(
            err.to_string(),
            "1/2 notifiers returned an error\n- telegram: telegram rejected the message (HTTP 400): Bad Request: chat not found"
        );
    }
}
