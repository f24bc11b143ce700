//! Notification delivery: a fixed registry of notifier backends.
//!
//! Each backend declares the command-line flags it needs. The binary merges
//! those flags into its parser and hands the parsed values back through
//! [`NotifierRegistry::configure`].

pub mod error;
pub mod flags;
pub mod telegram;

use async_trait::async_trait;

pub use error::{ChannelFailure, DeliveryFailures, NotifyError};
pub use flags::{FlagKind, FlagSpec, FlagValue, FlagValues};
pub use telegram::Telegram;

/// Text sent by [`NotifierRegistry::test_all`].
pub const TEST_MESSAGE: &str = "This is a test notification";

/// A notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Flags this notifier reads its settings from.
    fn flags(&self) -> &'static [FlagSpec];

    /// Takes the values of [`Notifier::flags`] after parsing. Flags that
    /// were not given are absent from `values`.
    fn configure(&mut self, values: &FlagValues) -> Result<(), NotifyError>;

    /// Whether enough settings were given for [`Notifier::send`] to work.
    fn is_configured(&self) -> bool;

    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Every notifier the program knows about.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifierRegistry {
    /// The built-in notifiers.
    pub fn new() -> Self {
        Self::with_notifiers(vec![Box::new(Telegram::new())])
    }

    pub fn with_notifiers(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// All declared flags, paired with the name of the notifier declaring them.
    pub fn flags(&self) -> impl Iterator<Item = (&'static str, &'static FlagSpec)> + '_ {
        self.notifiers
            .iter()
            .flat_map(|n| n.flags().iter().map(move |f| (n.name(), f)))
    }

    pub fn configure(&mut self, values: &FlagValues) -> Result<(), NotifyError> {
        for notifier in &mut self.notifiers {
            notifier.configure(values)?;
        }
        Ok(())
    }

    /// Names of the notifiers ready to send.
    pub fn configured(&self) -> Vec<&'static str> {
        self.notifiers
            .iter()
            .filter(|n| n.is_configured())
            .map(|n| n.name())
            .collect()
    }

    /// Sends `message` through every configured notifier.
    ///
    /// All of them are tried even when one fails. Returns how many
    /// delivered the message.
    pub async fn send(&self, message: &str) -> Result<usize, DeliveryFailures> {
        let mut attempted = 0;
        let mut failures = Vec::new();
        for notifier in self.notifiers.iter().filter(|n| n.is_configured()) {
            attempted += 1;
            if let Err(error) = notifier.send(message).await {
                tracing::warn!(notifier = notifier.name(), error = %error, "notification failed");
                failures.push(ChannelFailure {
                    notifier: notifier.name(),
                    error,
                });
            }
        }

        if failures.is_empty() {
            Ok(attempted)
        } else {
            Err(DeliveryFailures {
                attempted,
                failures,
            })
        }
    }

    /// Sends [`TEST_MESSAGE`] through every configured notifier. Fails when
    /// none is configured or any of them fails.
    pub async fn test_all(&self) -> Result<usize, NotifyError> {
        if self.configured().is_empty() {
            return Err(NotifyError::NoneConfigured);
        }
        Ok(self.send(TEST_MESSAGE).await?)
    }
}
