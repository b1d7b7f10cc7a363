//! Session, cookie, hashing and browser-origin settings.

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, Command, builder::ValueParser};
use secrecy::{ExposeSecret, SecretString};
use session_token::SigningKey;

use crate::api::{DEFAULT_CLIENT_URL, handlers::auth::Environment};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_CLIENT_URL: &str = "client-url";
pub const ARG_CLIENT_URLS: &str = "client-urls";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_ARGON2_MEMORY_KIB: &str = "argon2-memory-kib";
pub const ARG_ARGON2_ITERATIONS: &str = "argon2-iterations";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub environment: Environment,
    pub client_url: String,
    pub client_urls: Vec<String>,
    pub session_ttl_seconds: i64,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl Options {
    /// # Errors
    /// Returns an error if the secret is missing or shorter than the minimum key length.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --jwt-secret")?;
        if jwt_secret.expose_secret().len() < SigningKey::MIN_KEY_LENGTH {
            bail!(
                "--{ARG_JWT_SECRET} must be at least {} bytes",
                SigningKey::MIN_KEY_LENGTH
            );
        }

        let client_urls = matches
            .get_one::<String>(ARG_CLIENT_URLS)
            .map(|urls| {
                urls.split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            environment: matches
                .get_one::<Environment>(ARG_ENVIRONMENT)
                .copied()
                .unwrap_or_default(),
            client_url: matches
                .get_one::<String>(ARG_CLIENT_URL)
                .cloned()
                .unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
            client_urls,
            session_ttl_seconds: matches
                .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
                .copied()
                .context("missing --session-ttl-seconds")?,
            argon2_memory_kib: matches
                .get_one::<u32>(ARG_ARGON2_MEMORY_KIB)
                .copied()
                .context("missing --argon2-memory-kib")?,
            argon2_iterations: matches
                .get_one::<u32>(ARG_ARGON2_ITERATIONS)
                .copied()
                .context("missing --argon2-iterations")?,
        })
    }
}

fn validator_environment() -> ValueParser {
    ValueParser::from(|value: &str| -> std::result::Result<Environment, String> {
        value.parse::<Environment>()
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_session_args(command);
    with_client_args(command)
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret key used to sign session tokens (at least 16 bytes)")
                .env("USERREGIS_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment; production enables cross-site secure cookies")
                .env("USERREGIS_ENVIRONMENT")
                .default_value("development")
                .value_parser(validator_environment()),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session token and cookie lifetime in seconds")
                .env("USERREGIS_SESSION_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_ARGON2_MEMORY_KIB)
                .long(ARG_ARGON2_MEMORY_KIB)
                .help("Argon2id memory cost in KiB")
                .env("USERREGIS_ARGON2_MEMORY_KIB")
                .default_value("65536")
                .value_parser(clap::value_parser!(u32).range(8..)),
        )
        .arg(
            Arg::new(ARG_ARGON2_ITERATIONS)
                .long(ARG_ARGON2_ITERATIONS)
                .help("Argon2id iteration count")
                .env("USERREGIS_ARGON2_ITERATIONS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}

fn with_client_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_CLIENT_URL)
                .long(ARG_CLIENT_URL)
                .help("Primary browser origin allowed to call the API with credentials")
                .env("USERREGIS_CLIENT_URL")
                .default_value(DEFAULT_CLIENT_URL),
        )
        .arg(
            Arg::new(ARG_CLIENT_URLS)
                .long(ARG_CLIENT_URLS)
                .help("Additional allowed origins, comma separated")
                .env("USERREGIS_CLIENT_URLS"),
        )
}
