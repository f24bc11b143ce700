//! The reward catalog: limited rewards that were sold out when first seen.
//!
//! Membership is decided once, on the first successful reconciliation
//! ("bootstrap"). Every later reconciliation only refreshes the
//! availability of rewards already in the catalog.

use std::collections::BTreeMap;

use kickstarter_api::types::{ProjectData, RewardData};

use crate::error::RewardNotifierError;

/// Kickstarter reward identifier.
pub type RewardId = i64;

/// A limited reward tracked by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub id: RewardId,
    pub title: String,
    /// Title including the price, e.g. `Early Bird (€39)`.
    pub title_with_price: String,
    /// Minimum pledge, in the project's currency.
    pub price: i64,
    /// Slots currently left.
    pub available: i64,
    /// Maximum number of backers.
    pub limit: i64,
}

/// In-memory state of the watched project.
#[derive(Debug, Default)]
pub struct Project {
    name: String,
    currency_symbol: String,
    rewards: BTreeMap<RewardId, Reward>,
    initialized: bool,
}

impl Project {
    /// An empty, uninitialized project.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Whether the bootstrap reconciliation has happened.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Catalog rewards, ordered by ID.
    pub fn rewards(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.values()
    }

    pub fn reward(&self, id: RewardId) -> Option<&Reward> {
        self.rewards.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// IDs of every catalog reward whose price is exactly `price`.
    pub fn rewards_priced_at(&self, price: i64) -> Vec<RewardId> {
        self.rewards
            .values()
            .filter(|r| r.price == price)
            .map(|r| r.id)
            .collect()
    }

    /// Applies freshly extracted page data to the catalog.
    ///
    /// The first call records the project name, currency and the set of
    /// limited rewards with no slot left. Every call then copies `remaining`
    /// and `limit` onto the rewards already in the catalog. Rewards outside
    /// the catalog are ignored, whatever their state.
    pub fn reconcile(&mut self, data: &ProjectData) -> Result<(), RewardNotifierError> {
        if !self.initialized {
            self.bootstrap(data)?;
        }
        self.refresh(data)
    }

    fn bootstrap(&mut self, data: &ProjectData) -> Result<(), RewardNotifierError> {
        let name = required_str(data.name.as_ref(), "project", "name")?;
        let currency_symbol =
            required_str(data.currency_symbol.as_ref(), "project", "currency_symbol")?;

        let mut rewards = BTreeMap::new();
        for (pos, entry) in data.rewards.iter().enumerate() {
            if !entry.is_limited() {
                continue;
            }
            let id = truncate(required_num(entry.id, &format!("reward #{}", pos), "id")?);
            let context = format!("reward {}", id);
            let remaining = required_num(entry.remaining, &context, "remaining")?;
            if remaining != 0.0 {
                continue;
            }
            rewards.insert(id, new_reward(id, entry, &context)?);
        }

        tracing::info!(
            project = %name,
            tracked = rewards.len(),
            total = data.rewards.len(),
            "catalog initialized"
        );

        self.name = name;
        self.currency_symbol = currency_symbol;
        self.rewards = rewards;
        self.initialized = true;
        Ok(())
    }

    /// All-or-nothing: a bad entry leaves every reward untouched.
    fn refresh(&mut self, data: &ProjectData) -> Result<(), RewardNotifierError> {
        let mut updates = Vec::new();
        for entry in &data.rewards {
            let (Some(limit), Some(id)) = (entry.limit, entry.id) else {
                continue;
            };
            let id = truncate(id);
            if !self.rewards.contains_key(&id) {
                continue;
            }
            let remaining =
                required_num(entry.remaining, &format!("reward {}", id), "remaining")?;
            updates.push((id, truncate(remaining).max(0), truncate(limit)));
        }

        for (id, available, limit) in updates {
            if let Some(reward) = self.rewards.get_mut(&id) {
                reward.available = available;
                reward.limit = limit;
            }
        }
        Ok(())
    }
}

fn new_reward(id: RewardId, entry: &RewardData, context: &str) -> Result<Reward, RewardNotifierError> {
    Ok(Reward {
        id,
        title: required_str(entry.title.as_ref(), context, "title")?,
        title_with_price: required_str(
            entry.title_for_backing_tier.as_ref(),
            context,
            "title_for_backing_tier",
        )?,
        price: truncate(required_num(entry.minimum, context, "minimum")?),
        available: 0,
        limit: 0,
    })
}

/// Page numbers are whole counts encoded as JSON floats.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn required_str(
    value: Option<&String>,
    context: &str,
    field: &str,
) -> Result<String, RewardNotifierError> {
    value
        .cloned()
        .ok_or_else(|| missing(context, field))
}

fn required_num(value: Option<f64>, context: &str, field: &str) -> Result<f64, RewardNotifierError> {
    value.ok_or_else(|| missing(context, field))
}

fn missing(context: &str, field: &str) -> RewardNotifierError {
    RewardNotifierError::MalformedData(format!("{}: missing \"{}\"", context, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(id: i64, minimum: f64, limit: Option<f64>, remaining: Option<f64>) -> RewardData {
        RewardData {
            id: Some(id as f64),
            title: Some(format!("Tier {}", id)),
            title_for_backing_tier: Some(format!("Tier {} ({}€)", id, minimum)),
            minimum: Some(minimum),
            remaining,
            limit,
        }
    }

    fn project(rewards: Vec<RewardData>) -> ProjectData {
        ProjectData {
            name: Some("Skyward Tactics".into()),
            currency_symbol: Some("€".into()),
            rewards,
            ..Default::default()
        }
    }

    #[test]
    fn bootstrap_keeps_only_limited_and_exhausted() {
        let data = project(vec![
            reward(1, 10.0, Some(50.0), Some(0.0)),
            reward(2, 20.0, None, None),
            reward(3, 30.0, Some(10.0), Some(4.0)),
            reward(4, 40.0, None, Some(0.0)),
        ]);
        let mut p = Project::new();
        p.reconcile(&data).unwrap();

        assert!(p.is_initialized());
        assert_eq!(p.name(), "Skyward Tactics");
        assert_eq!(p.currency_symbol(), "€");
        let ids: Vec<RewardId> = p.rewards().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        let r = p.reward(1).unwrap();
        assert_eq!(r.price, 10);
        assert_eq!(r.limit, 50);
        assert_eq!(r.available, 0);
        assert_eq!(r.title_with_price, "Tier 1 (10€)");
    }

    #[test]
    fn membership_is_frozen_after_bootstrap() {
        let mut p = Project::new();
        p.reconcile(&project(vec![
            reward(1, 10.0, Some(50.0), Some(0.0)),
            reward(2, 20.0, None, None),
            reward(3, 30.0, Some(10.0), Some(4.0)),
        ]))
        .unwrap();

        // 2 becomes limited and 3 sells out: neither joins the catalog.
        p.reconcile(&project(vec![
            reward(1, 10.0, Some(50.0), Some(0.0)),
            reward(2, 20.0, Some(5.0), Some(0.0)),
            reward(3, 30.0, Some(10.0), Some(0.0)),
        ]))
        .unwrap();

        assert_eq!(p.len(), 1);
        assert!(p.reward(2).is_none());
        assert!(p.reward(3).is_none());
    }

    #[test]
    fn refresh_updates_only_mutable_fields() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0))]))
            .unwrap();
        let before = p.reward(1).unwrap().clone();

        let mut changed = reward(1, 99.0, Some(60.0), Some(5.0));
        changed.title = Some("Renamed".into());
        changed.title_for_backing_tier = Some("Renamed (99€)".into());
        let mut data = project(vec![changed]);
        data.name = Some("Other name".into());
        p.reconcile(&data).unwrap();

        let after = p.reward(1).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.title, before.title);
        assert_eq!(after.title_with_price, before.title_with_price);
        assert_eq!(after.price, before.price);
        assert_eq!(after.available, 5);
        assert_eq!(after.limit, 60);
        assert_eq!(p.name(), "Skyward Tactics");
    }

    #[test]
    fn regained_rewards_stay_in_catalog() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0))]))
            .unwrap();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(3.0))]))
            .unwrap();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0))]))
            .unwrap();
        assert_eq!(p.reward(1).unwrap().available, 0);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn reward_missing_from_page_keeps_last_values() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0))]))
            .unwrap();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(2.0))]))
            .unwrap();
        p.reconcile(&project(vec![])).unwrap();
        assert_eq!(p.reward(1).unwrap().available, 2);
    }

    #[test]
    fn failed_refresh_leaves_catalog_untouched() {
        let mut p = Project::new();
        p.reconcile(&project(vec![
            reward(1, 10.0, Some(50.0), Some(0.0)),
            reward(2, 20.0, Some(30.0), Some(0.0)),
        ]))
        .unwrap();

        let err = p
            .reconcile(&project(vec![
                reward(1, 10.0, Some(50.0), Some(7.0)),
                reward(2, 20.0, Some(30.0), None),
            ]))
            .unwrap_err();
        assert!(matches!(err, RewardNotifierError::MalformedData(_)));
        assert_eq!(p.reward(1).unwrap().available, 0);
        assert_eq!(p.reward(2).unwrap().available, 0);
    }

    #[test]
    fn numbers_are_truncated() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 24.99, Some(50.7), Some(0.0))]))
            .unwrap();
        p.reconcile(&project(vec![reward(1, 24.99, Some(50.7), Some(3.9))]))
            .unwrap();
        let r = p.reward(1).unwrap();
        assert_eq!(r.price, 24);
        assert_eq!(r.limit, 50);
        assert_eq!(r.available, 3);
    }

    #[test]
    fn near_zero_remaining_is_not_exhausted() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0001))]))
            .unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn negative_remaining_is_clamped() {
        let mut p = Project::new();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(0.0))]))
            .unwrap();
        p.reconcile(&project(vec![reward(1, 10.0, Some(50.0), Some(-2.0))]))
            .unwrap();
        assert_eq!(p.reward(1).unwrap().available, 0);
    }

    #[test]
    fn missing_backing_tier_title_is_malformed() {
        let mut entry = reward(1, 10.0, Some(50.0), Some(0.0));
        entry.title_for_backing_tier = None;
        let mut p = Project::new();
        let err = p.reconcile(&project(vec![entry])).unwrap_err();
        match err {
            RewardNotifierError::MalformedData(msg) => {
                assert!(msg.contains("title_for_backing_tier"), "{msg}");
                assert!(msg.contains("reward 1"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!p.is_initialized());
        assert!(p.is_empty());
    }

    #[test]
    fn missing_fields_on_untracked_rewards_are_ignored() {
        let mut unlimited = reward(2, 20.0, None, None);
        unlimited.title_for_backing_tier = None;
        let mut p = Project::new();
        p.reconcile(&project(vec![unlimited])).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn missing_project_name_is_malformed() {
        let mut data = project(vec![]);
        data.name = None;
        let err = Project::new().reconcile(&data).unwrap_err();
        assert!(matches!(err, RewardNotifierError::MalformedData(_)));
    }

    #[test]
    fn limited_reward_without_remaining_is_malformed() {
        let mut p = Project::new();
        let err = p
            .reconcile(&project(vec![reward(1, 10.0, Some(50.0), None)]))
            .unwrap_err();
        assert!(matches!(err, RewardNotifierError::MalformedData(_)));
    }

    #[test]
    fn price_lookup_returns_all_ties() {
        let mut p = Project::new();
        p.reconcile(&project(vec![
            reward(1, 25.0, Some(50.0), Some(0.0)),
            reward(2, 25.0, Some(20.0), Some(0.0)),
            reward(3, 40.0, Some(20.0), Some(0.0)),
        ]))
        .unwrap();
        assert_eq!(p.rewards_priced_at(25), vec![1, 2]);
        assert!(p.rewards_priced_at(99).is_empty());
    }
}
