use clap::{Arg, ArgMatches, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

/// Output shape of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Logging settings read from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub level: Option<Level>,
    pub format: LogFormat,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let verbosity = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);
        Self {
            level: level_for(verbosity),
            format: matches
                .get_one::<LogFormat>(ARG_LOG_FORMAT)
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// `-v` count to level; no flag keeps the subscriber default.
const fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>()
            && parsed <= 5
        {
            return Ok(parsed);
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
pub fn validator_log_format() -> ValueParser {
    ValueParser::from(
        move |format: &str| -> std::result::Result<LogFormat, String> {
            match format.to_lowercase().as_str() {
                "pretty" => Ok(LogFormat::Pretty),
                "json" => Ok(LogFormat::Json),
                _ => Err("expected 'pretty' or 'json'".to_string()),
            }
        },
    )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("USERREGIS_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long("log-format")
                .help("Log output format: pretty or json")
                .env("USERREGIS_LOG_FORMAT")
                .default_value("pretty")
                .global(true)
                .value_parser(validator_log_format()),
        )
}
