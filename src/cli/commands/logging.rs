use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("GOLDENLOCK_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long("log-format")
                .help("Log output format")
                .env("GOLDENLOCK_LOG_FORMAT")
                .value_parser(["pretty", "json"])
                .default_value("pretty"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("goldenlock"))
    }

    #[test]
    fn test_log_level_names() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, level) in levels.iter().enumerate() {
            temp_env::with_vars([("GOLDENLOCK_LOG_LEVEL", Some(*level))], || {
                let matches = command().get_matches_from(vec!["goldenlock"]);
                assert_eq!(
                    matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_log_level_flags() {
        temp_env::with_vars([("GOLDENLOCK_LOG_LEVEL", None::<String>)], || {
            let matches = command().get_matches_from(vec!["goldenlock", "-vvv"]);
            assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(3));
        });
    }

    #[test]
    fn test_log_format() {
        temp_env::with_vars([("GOLDENLOCK_LOG_FORMAT", None::<String>)], || {
            let matches = command().get_matches_from(vec!["goldenlock"]);
            assert_eq!(
                matches.get_one::<String>(ARG_LOG_FORMAT).map(String::as_str),
                Some("pretty")
            );

            let matches = command().get_matches_from(vec!["goldenlock", "--log-format", "json"]);
            assert_eq!(
                matches.get_one::<String>(ARG_LOG_FORMAT).map(String::as_str),
                Some("json")
            );

            assert!(command()
                .try_get_matches_from(vec!["goldenlock", "--log-format", "xml"])
                .is_err());
        });
    }
}
