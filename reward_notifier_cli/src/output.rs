use reward_notifier_lib::{Project, Reward, WatchSet};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RewardRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Reward")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Backers")]
    backers: i64,
}

impl RewardRow {
    fn new(reward: &Reward, currency_symbol: &str) -> Self {
        Self {
            id: reward.id,
            title: reward.title.clone(),
            price: format!("{}{}", reward.price, currency_symbol),
            backers: reward.limit,
        }
    }
}

pub fn watch_summary(project: &Project, watch: &WatchSet) -> String {
    let rows: Vec<RewardRow> = watch
        .rewards(project)
        .map(|r| RewardRow::new(r, project.currency_symbol()))
        .collect();
    let noun = if rows.len() == 1 { "reward" } else { "rewards" };
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    format!("{} {} watched:\n{}", rows.len(), noun, table)
}

pub fn print_watch_summary(project: &Project, watch: &WatchSet) {
    println!("{}", watch_summary(project, watch));
}

pub fn unmatched_price_line(price: i64, currency_symbol: &str) -> String {
    format!(
        "There is no limited and unavailable reward priced at {}{}, ignoring.",
        price, currency_symbol
    )
}
