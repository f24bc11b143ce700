//! Telegram Bot API notifier.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::flags::{FlagKind, FlagSpec, FlagValue, FlagValues};
use super::{NotifyError, Notifier};

const NAME: &str = "telegram";

const DEFAULT_API_URL: &str = "https://api.telegram.org";

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        long: "tg-token",
        short: None,
        help: "Telegram notifier: Bot authentication token",
        kind: FlagKind::String,
        env: "TG_TOKEN",
    },
    FlagSpec {
        long: "tg-user-id",
        short: None,
        help: "Telegram notifier: User ID of the user to notify",
        kind: FlagKind::Int,
        env: "TG_USER_ID",
    },
];

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Reply envelope of every Bot API method.
#[derive(Debug, Deserialize)]
struct BotReply {
    ok: bool,
    description: Option<String>,
}

/// Sends direct messages to one Telegram user through a bot.
pub struct Telegram {
    token: String,
    user_id: i64,
    api_url: String,
    http: reqwest::Client,
}

impl Default for Telegram {
    fn default() -> Self {
        Self::new()
    }
}

impl Telegram {
    pub fn new() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }

    /// Points the notifier at another Bot API server. Used for testing with wiremock.
    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            token: String::new(),
            user_id: 0,
            api_url: api_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for Telegram {
    fn name(&self) -> &'static str {
        NAME
    }

    fn flags(&self) -> &'static [FlagSpec] {
        FLAGS
    }

    fn configure(&mut self, values: &FlagValues) -> Result<(), NotifyError> {
        match values.get("tg-token") {
            Some(FlagValue::String(token)) => self.token = token.trim().to_string(),
            Some(_) => return Err(invalid("tg-token", FlagKind::String)),
            None => {}
        }
        match values.get("tg-user-id") {
            Some(FlagValue::Int(id)) => self.user_id = *id,
            Some(_) => return Err(invalid("tg-user-id", FlagKind::Int)),
            None => {}
        }
        Ok(())
    }

    /// Both the token and the user ID must be set.
    fn is_configured(&self) -> bool {
        !self.token.is_empty() && self.user_id != 0
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        if !self.is_configured() {
            return Ok(());
        }

        tracing::info!(user_id = self.user_id, "sending a Telegram notification");
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let resp = self
            .http
            .post(&url)
            .timeout(SEND_TIMEOUT)
            .json(&SendMessage {
                chat_id: self.user_id,
                text: message,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Network {
                notifier: NAME,
                // The URL carries the bot token.
                source: e.without_url(),
            })?;

        let status = resp.status();
        let reply = resp.json::<BotReply>().await.ok();
        match reply {
            Some(BotReply { ok: true, .. }) if status.is_success() => Ok(()),
            reply => {
                let description = reply
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
                tracing::warn!(
                    user_id = self.user_id,
                    status = %status,
                    description = %description,
                    "failed to send a Telegram notification"
                );
                Err(NotifyError::Rejected {
                    notifier: NAME,
                    status: status.as_u16(),
                    description,
                })
            }
        }
    }
}

fn invalid(flag: &str, expected: FlagKind) -> NotifyError {
    NotifyError::InvalidFlag {
        flag: flag.to_string(),
        expected: expected.as_str(),
    }
}
