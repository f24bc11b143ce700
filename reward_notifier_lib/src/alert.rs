//! Detection of watched rewards that have slots again.

use crate::catalog::{Project, Reward, RewardId};
use crate::watch::WatchSet;

/// A watched reward with at least one slot available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub reward_id: RewardId,
    pub title_with_price: String,
    pub available: i64,
    pub limit: i64,
}

impl Alert {
    fn from_reward(reward: &Reward) -> Self {
        Self {
            reward_id: reward.id,
            title_with_price: reward.title_with_price.clone(),
            available: reward.available,
            limit: reward.limit,
        }
    }

    /// Short line for the console, e.g. `3/50 of reward "Early Bird (€39)" available!`.
    pub fn message(&self) -> String {
        format!(
            "{}/{} of reward \"{}\" available!",
            self.available, self.limit, self.title_with_price
        )
    }

    /// Text sent through the notifiers.
    pub fn notification(&self, project_name: &str) -> String {
        format!(
            "Alert about Kickstarter project \"{}\": {}",
            project_name,
            self.message()
        )
    }
}

/// One alert per watched reward with `available > 0`.
///
/// No state is kept between calls: a reward that stays available is
/// reported on every scan.
pub fn scan(project: &Project, watch: &WatchSet) -> Vec<Alert> {
    watch
        .rewards(project)
        .filter(|r| r.available > 0)
        .map(Alert::from_reward)
        .collect()
}
