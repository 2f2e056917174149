use crate::config::{self, Overrides};
use clap::{Arg, ArgMatches, Command};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_TOAST_DURATION: &str = "toast-duration";
pub const ARG_SESSION_FILE: &str = "session-file";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("Base URL of the accounts API")
                .env("GOLDENLOCK_API_BASE_URL")
                .default_value(config::DEFAULT_API_BASE_URL),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("GOLDENLOCK_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_TOAST_DURATION)
                .long("toast-duration")
                .help("Notification lifetime in milliseconds, 0 keeps them until dismissed")
                .env("GOLDENLOCK_TOAST_DURATION_MS")
                .default_value("5000")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("Where to cache the session metadata (default: ~/.goldenlock/session.json)")
                .env("GOLDENLOCK_SESSION_FILE"),
        )
}

/// Collects the configuration overrides from parsed arguments.
#[must_use]
pub fn overrides(matches: &ArgMatches) -> Overrides {
    Overrides {
        api_base_url: matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
        timeout_seconds: matches.get_one::<u64>(ARG_TIMEOUT).copied(),
        toast_duration_ms: matches.get_one::<u64>(ARG_TOAST_DURATION).copied(),
        session_file: matches.get_one::<String>(ARG_SESSION_FILE).cloned(),
    }
}
