use inquire::list_option::ListOption;
use inquire::validator::Validation;
use inquire::{CustomUserError, MultiSelect};
use reward_notifier_lib::{RewardChoice, RewardChooser, WatchError};

const PAGE_SIZE: usize = 100;

/// Terminal multi-select menu.
pub struct InquirePrompt;

impl RewardChooser for InquirePrompt {
    fn choose(&mut self, choices: Vec<RewardChoice>) -> Result<Vec<RewardChoice>, WatchError> {
        // Blocks on terminal input; requires the multi-threaded runtime.
        tokio::task::block_in_place(|| {
            MultiSelect::new("Please select the rewards to watch:", choices)
                .with_page_size(PAGE_SIZE)
                .with_validator(at_least_one)
                .prompt()
        })
        .map_err(|e| WatchError::Prompt(e.to_string()))
    }
}

fn at_least_one(selected: &[ListOption<&RewardChoice>]) -> Result<Validation, CustomUserError> {
    if selected.is_empty() {
        Ok(Validation::Invalid("Select at least one reward".into()))
    } else {
        Ok(Validation::Valid)
    }
}
