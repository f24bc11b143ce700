use serde::{Deserialize, Serialize};

/// The project blob embedded in a Kickstarter description page.
///
/// Every field is optional: the page is scraped rather than served by a
/// versioned API, so required-ness is checked by the consumer, which can
/// report exactly which field went missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectData {
    pub id: Option<f64>,

    pub name: Option<String>,

    pub currency_symbol: Option<String>,

    pub currency: Option<String>,

    #[serde(default)]
    pub rewards: Vec<RewardData>,
}

/// A single pledge tier as it appears in the page data.
///
/// Numbers are kept as `f64` because the page emits them as plain JSON
/// numbers; callers truncate to integers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RewardData {
    pub id: Option<f64>,

    pub title: Option<String>,

    pub title_for_backing_tier: Option<String>,

    pub minimum: Option<f64>,

    /// Remaining slots. Only meaningful for limited rewards.
    pub remaining: Option<f64>,

    /// Maximum number of backers. Absent (or null) for unlimited rewards.
    pub limit: Option<f64>,
}

impl RewardData {
    /// Whether the reward declares a backer cap.
    pub fn is_limited(&self) -> bool {
        self.limit.is_some()
    }

    /// Limited and no slot left. The comparison is exact on purpose: the
    /// page encodes whole unit counts.
    pub fn is_exhausted(&self) -> bool {
        self.is_limited() && self.remaining == Some(0.0)
    }
}
