//! The polling context: one project, its watch set and the notifiers.

use async_trait::async_trait;
use kickstarter_api::types::ProjectData;
use url::Url;

use crate::alert::{self, Alert};
use crate::catalog::Project;
use crate::error::RewardNotifierError;
use crate::notify::{DeliveryFailures, NotifierRegistry};
use crate::retry::{with_retry, RetryPolicy};
use crate::watch::{self, RewardChooser, Selection, WatchError, WatchMode, WatchSet};

/// Where project data comes from.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn fetch_project(&self, url: &Url) -> Result<ProjectData, kickstarter_api::Error>;
}

#[async_trait]
impl ProjectSource for kickstarter_api::Client {
    async fn fetch_project(&self, url: &Url) -> Result<ProjectData, kickstarter_api::Error> {
        self.get_project(url).await
    }
}

/// What one poll found.
#[derive(Debug, Default)]
pub struct PollOutcome {
    pub alerts: Vec<Alert>,
    /// Delivery failures, one entry per alert that some notifier failed to send.
    pub failures: Vec<DeliveryFailures>,
}

impl PollOutcome {
    /// Whether any watched reward was available.
    pub fn found(&self) -> bool {
        !self.alerts.is_empty()
    }
}

/// Owns everything the polling loop needs.
pub struct Monitor<S> {
    source: S,
    url: Url,
    project: Project,
    watch: WatchSet,
    notifiers: NotifierRegistry,
    retry: RetryPolicy,
}

impl<S: ProjectSource> Monitor<S> {
    pub fn new(source: S, url: Url, notifiers: NotifierRegistry) -> Self {
        Self {
            source,
            url,
            project: Project::new(),
            watch: WatchSet::new(),
            notifiers,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn watch(&self) -> &WatchSet {
        &self.watch
    }

    pub fn notifiers(&self) -> &NotifierRegistry {
        &self.notifiers
    }

    /// Fetches the project page and reconciles the catalog with it.
    pub async fn refresh(&mut self) -> Result<(), RewardNotifierError> {
        let source = &self.source;
        let url = &self.url;
        let data = with_retry(&self.retry, || source.fetch_project(url))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    kind = e.kind().as_str(),
                    error = %e,
                    url = %url,
                    "project page unusable"
                )
            })?;
        self.project.reconcile(&data)
    }

    /// Chooses the watched rewards. Call once, after the first [`Monitor::refresh`].
    pub fn select(
        &mut self,
        mode: &WatchMode,
        chooser: &mut dyn RewardChooser,
    ) -> Result<Selection, WatchError> {
        let selection = watch::select(&self.project, mode, chooser)?;
        if let Selection::Watch { watch, .. } = &selection {
            self.watch = watch.clone();
        }
        Ok(selection)
    }

    /// One cycle: refresh, then notify about every available watched reward.
    ///
    /// Notifier failures are logged and returned in the outcome; they never
    /// fail the poll.
    pub async fn poll(&mut self) -> Result<PollOutcome, RewardNotifierError> {
        self.refresh().await?;

        let mut outcome = PollOutcome {
            alerts: alert::scan(&self.project, &self.watch),
            failures: Vec::new(),
        };
        for alert in &outcome.alerts {
            tracing::info!(
                reward_id = alert.reward_id,
                available = alert.available,
                limit = alert.limit,
                "{}",
                alert.message()
            );
            let text = alert.notification(self.project.name());
            if let Err(failures) = self.notifiers.send(&text).await {
                tracing::warn!(reward_id = alert.reward_id, error = %failures, "notification not delivered");
                outcome.failures.push(failures);
            }
        }
        Ok(outcome)
    }
}
