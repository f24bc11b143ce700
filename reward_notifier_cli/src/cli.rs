//! Command-line surface: static options plus the flags each notifier declares.

use std::ffi::OsString;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use reward_notifier_lib::notify::{FlagKind, FlagSpec, FlagValue, FlagValues};
use reward_notifier_lib::{validation, NotifierRegistry, WatchMode};

/// Get notified when limited rewards on Kickstarter are available
#[derive(Parser, Debug)]
#[command(name = "kickstarter-reward-notifier")]
#[command(override_usage = "kickstarter-reward-notifier [OPTION] PROJECT_URL")]
pub struct Cli {
    /// Kickstarter project URL
    #[arg(value_name = "PROJECT_URL")]
    pub url: String,

    /// Comma-separated list of unavailable limited rewards to watch, identified by their
    /// price in the project's original currency. If multiple limited rewards share the same
    /// price, all are watched. Ignored if --all is set
    #[arg(short, long, value_delimiter = ',')]
    pub rewards: Vec<i64>,

    /// If set, watch all unavailable limited rewards
    #[arg(short, long)]
    pub all: bool,

    /// Interval between checks (e.g. 30s, 1m, 1h30m)
    #[arg(short, long, default_value = "1m", value_parser = parse_duration)]
    pub interval: Duration,

    /// Quiet mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Send a test notification at start, fail if any configured notifier fails
    #[arg(short, long)]
    pub test_notification: bool,

    /// Timeout of a project page request
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Retry a failed page request this many times on network errors and 5xx/429
    /// responses, with exponential backoff. 0 exits on the first failure
    #[arg(long, default_value_t = 0)]
    pub fetch_retries: u32,
}

impl Cli {
    pub fn watch_mode(&self) -> WatchMode {
        if self.all {
            WatchMode::All
        } else if !self.rewards.is_empty() {
            WatchMode::Prices(self.rewards.clone())
        } else {
            WatchMode::Interactive
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    validation::parse_duration(s).map_err(|e| e.to_string())
}

/// The full command: static options followed by every notifier flag.
pub fn command(registry: &NotifierRegistry) -> Command {
    registry
        .flags()
        .fold(Cli::command(), |cmd, (_, flag)| cmd.arg(notifier_arg(flag)))
}

fn notifier_arg(flag: &'static FlagSpec) -> Arg {
    let mut arg = Arg::new(flag.long)
        .long(flag.long)
        .help(flag.help)
        .env(flag.env)
        .help_heading("Notifiers");
    if let Some(short) = flag.short {
        arg = arg.short(short);
    }
    match flag.kind {
        FlagKind::String => arg.action(ArgAction::Set).value_parser(value_parser!(String)),
        FlagKind::Int => arg.action(ArgAction::Set).value_parser(value_parser!(i64)),
        FlagKind::Bool => arg.action(ArgAction::SetTrue),
    }
}

/// Parses `args` and collects the notifier flag values.
pub fn parse_from<I, T>(registry: &NotifierRegistry, args: I) -> Result<(Cli, FlagValues), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(registry).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, flag_values(registry, &matches)))
}

fn flag_values(registry: &NotifierRegistry, matches: &ArgMatches) -> FlagValues {
    let mut values = FlagValues::new();
    for (_, flag) in registry.flags() {
        let value = match flag.kind {
            FlagKind::String => matches
                .get_one::<String>(flag.long)
                .cloned()
                .map(FlagValue::String),
            FlagKind::Int => matches.get_one::<i64>(flag.long).copied().map(FlagValue::Int),
            FlagKind::Bool => matches.get_one::<bool>(flag.long).copied().map(FlagValue::Bool),
        };
        if let Some(value) = value {
            values.insert(flag.long.to_string(), value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const URL: &str = "https://www.kickstarter.com/projects/diceforge/skyward";

    fn parse(args: &[&str]) -> Result<(Cli, FlagValues), clap::Error> {
        let registry = NotifierRegistry::new();
        let mut argv = vec!["kickstarter-reward-notifier"];
        argv.extend_from_slice(args);
        parse_from(&registry, argv)
    }

    #[test]
    fn command_is_well_formed() {
        command(&NotifierRegistry::new()).debug_assert();
    }

    #[test]
    fn defaults() {
        let (cli, _) = parse(&[URL]).unwrap();
        assert_eq!(cli.url, URL);
        assert_eq!(cli.interval, Duration::from_secs(60));
        assert_eq!(cli.timeout, Duration::from_secs(30));
        assert_eq!(cli.fetch_retries, 0);
        assert!(!cli.quiet);
        assert!(!cli.test_notification);
        assert_eq!(cli.watch_mode(), WatchMode::Interactive);
    }

    #[test]
    fn short_flags() {
        let (cli, _) = parse(&["-q", "-t", "-i", "30s", "-r", "25,40", URL]).unwrap();
        assert!(cli.quiet);
        assert!(cli.test_notification);
        assert_eq!(cli.interval, Duration::from_secs(30));
        assert_eq!(cli.watch_mode(), WatchMode::Prices(vec![25, 40]));
    }

    #[test]
    fn all_wins_over_rewards() {
        let (cli, _) = parse(&["--all", "--rewards", "25", URL]).unwrap();
        assert_eq!(cli.watch_mode(), WatchMode::All);
    }

    #[test]
    fn notifier_flags_are_collected() {
        let (_, values) = parse(&["--tg-token", "123:abc", "--tg-user-id", "42", URL]).unwrap();
        assert_eq!(
            values.get("tg-token"),
            Some(&FlagValue::String("123:abc".into()))
        );
        assert_eq!(values.get("tg-user-id"), Some(&FlagValue::Int(42)));
    }

    #[test]
    fn notifier_int_flag_is_validated() {
        assert!(parse(&["--tg-user-id", "abc", URL]).is_err());
    }

    #[test]
    fn bad_interval() {
        assert!(parse(&["-i", "soon", URL]).is_err());
        assert!(parse(&["-i", "0s", URL]).is_err());
        assert!(parse(&["-i", "99999999999999999999h", URL]).is_err());
    }

    #[test]
    fn url_is_required() {
        let err = parse(&["-a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn single_url_only() {
        assert!(parse(&[URL, URL]).is_err());
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }
}
