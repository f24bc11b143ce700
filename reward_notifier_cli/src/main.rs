mod cli;
mod output;
mod prompt;
mod run;

use std::process::ExitCode;

use anyhow::{Context, Result};
use reward_notifier_lib::kickstarter_api::Client;
use reward_notifier_lib::{validation, Monitor, NotifierRegistry, RetryPolicy};
use tracing_subscriber::EnvFilter;

use crate::prompt::InquirePrompt;
use crate::run::RunOptions;

const DEFAULT_LOG_DIRECTIVES: &str =
    "reward_notifier_cli=info,reward_notifier_lib=info,kickstarter_api=info";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut registry = NotifierRegistry::new();
    let (args, flag_values) = match cli::parse_from(&registry, std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = e.print();
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    if let Err(e) = registry.configure(&flag_values) {
        eprintln!("Error: {e}");
        return Ok(ExitCode::FAILURE);
    }

    if args.test_notification {
        println!("Testing the notifications...");
        match registry.test_all().await {
            Ok(sent) => println!("All {sent} configured notifiers passed the test."),
            Err(e) => {
                eprintln!("Failure during notification test: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let url = match validation::normalize_project_url(&args.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = Client::with_timeout(args.timeout).context("failed to build the HTTP client")?;
    let monitor = Monitor::new(client, url, registry)
        .with_retry(RetryPolicy::with_retries(args.fetch_retries));

    run::run(
        monitor,
        &mut InquirePrompt,
        RunOptions {
            mode: args.watch_mode(),
            interval: args.interval,
            quiet: args.quiet,
        },
    )
    .await?;

    Ok(ExitCode::SUCCESS)
}
