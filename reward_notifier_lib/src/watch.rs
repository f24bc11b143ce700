//! Selection of the catalog rewards to watch.

use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{Project, Reward, RewardId};

/// How the operator asked for rewards to be chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMode {
    /// Every reward in the catalog.
    All,
    /// Rewards priced at one of these amounts. Falls back to
    /// [`WatchMode::Interactive`] when nothing matches.
    Prices(Vec<i64>),
    /// Ask the operator.
    Interactive,
}

/// The IDs of the watched rewards. Fixed once selected; the rewards
/// themselves are read from the catalog on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    ids: BTreeSet<RewardId>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: RewardId) {
        self.ids.insert(id);
    }

    pub fn contains(&self, id: RewardId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RewardId> + '_ {
        self.ids.iter().copied()
    }

    /// The watched rewards as currently recorded in `project`.
    pub fn rewards<'a>(&'a self, project: &'a Project) -> impl Iterator<Item = &'a Reward> + 'a {
        self.ids.iter().filter_map(move |id| project.reward(*id))
    }
}

impl FromIterator<RewardId> for WatchSet {
    fn from_iter<I: IntoIterator<Item = RewardId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// One entry of the interactive menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardChoice {
    pub id: RewardId,
    pub label: String,
}

impl RewardChoice {
    pub fn from_reward(reward: &Reward) -> Self {
        Self {
            id: reward.id,
            label: format!("{} ({} backers)", reward.title_with_price, reward.limit),
        }
    }
}

impl fmt::Display for RewardChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Interactive multi-choice prompt.
///
/// Implementations must return at least one of the offered choices and
/// keep asking until they do.
pub trait RewardChooser {
    fn choose(&mut self, choices: Vec<RewardChoice>) -> Result<Vec<RewardChoice>, WatchError>;
}

#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    #[error("reward selection failed: {0}")]
    Prompt(String),
    #[error("no reward selected")]
    NothingSelected,
}

/// Result of [`select`].
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    /// The catalog is empty: every limited reward is available.
    NothingToWatch,
    Watch {
        watch: WatchSet,
        /// Requested prices that matched no catalog reward.
        unmatched_prices: Vec<i64>,
    },
}

/// Resolves `mode` against the catalog.
///
/// The chooser is only consulted in interactive mode, or when a price list
/// matched nothing.
pub fn select(
    project: &Project,
    mode: &WatchMode,
    chooser: &mut dyn RewardChooser,
) -> Result<Selection, WatchError> {
    if project.is_empty() {
        return Ok(Selection::NothingToWatch);
    }

    let mut watch = WatchSet::new();
    let mut unmatched_prices = Vec::new();

    match mode {
        WatchMode::All => {
            watch = project.rewards().map(|r| r.id).collect();
        }
        WatchMode::Prices(prices) => {
            for &price in prices {
                let ids = project.rewards_priced_at(price);
                if ids.is_empty() {
                    tracing::warn!(
                        price,
                        currency = project.currency_symbol(),
                        "no limited and unavailable reward at this price"
                    );
                    unmatched_prices.push(price);
                    continue;
                }
                for id in ids {
                    watch.insert(id);
                }
            }
        }
        WatchMode::Interactive => {}
    }

    if watch.is_empty() {
        watch = ask(project, chooser)?;
    }

    Ok(Selection::Watch {
        watch,
        unmatched_prices,
    })
}

fn ask(project: &Project, chooser: &mut dyn RewardChooser) -> Result<WatchSet, WatchError> {
    let choices: Vec<RewardChoice> = project.rewards().map(RewardChoice::from_reward).collect();
    let chosen = chooser.choose(choices)?;
    let watch: WatchSet = chosen
        .into_iter()
        .map(|c| c.id)
        .filter(|id| project.reward(*id).is_some())
        .collect();
    if watch.is_empty() {
        return Err(WatchError::NothingSelected);
    }
    Ok(watch)
}
