mod project;
pub use self::project::{ProjectData, RewardData};
