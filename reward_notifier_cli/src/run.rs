//! The watch loop: first fetch, reward selection, then poll until interrupted.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use reward_notifier_lib::{Monitor, PollOutcome, ProjectSource, RewardChooser, Selection, WatchMode};

use crate::output;

pub struct RunOptions {
    pub mode: WatchMode,
    pub interval: Duration,
    pub quiet: bool,
}

pub async fn run<S: ProjectSource>(
    mut monitor: Monitor<S>,
    chooser: &mut dyn RewardChooser,
    opts: RunOptions,
) -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        res = monitor.refresh() => res.context("failed to get the project data")?,
        _ = &mut ctrl_c => {
            tracing::info!("interrupted");
            return Ok(());
        }
    }

    let unmatched = match monitor.select(&opts.mode, chooser)? {
        Selection::NothingToWatch => {
            println!("All of this project's limited rewards are currently available.");
            return Ok(());
        }
        Selection::Watch { unmatched_prices, .. } => unmatched_prices,
    };
    for price in unmatched {
        println!(
            "{}",
            output::unmatched_price_line(price, monitor.project().currency_symbol())
        );
    }
    output::print_watch_summary(monitor.project(), monitor.watch());
    tracing::info!(
        url = %monitor.url(),
        watched = monitor.watch().len(),
        interval = ?opts.interval,
        notifiers = ?monitor.notifiers().configured(),
        "watching"
    );

    loop {
        tokio::select! {
            res = tick(&mut monitor, opts.interval) => {
                let outcome = res.context("failed to refresh the project data")?;
                report(&outcome, opts.quiet)?;
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                return Ok(());
            }
        }
    }
}

async fn tick<S: ProjectSource>(monitor: &mut Monitor<S>, interval: Duration) -> Result<PollOutcome> {
    tokio::time::sleep(interval).await;
    Ok(monitor.poll().await?)
}

fn report(outcome: &PollOutcome, quiet: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if outcome.found() {
        for alert in &outcome.alerts {
            writeln!(stdout, "\n{}", alert.message())?;
        }
    } else if !quiet {
        write!(stdout, ".")?;
        stdout.flush()?;
    }
    Ok(())
}
