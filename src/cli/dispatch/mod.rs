//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run, currently always the
//! API server with its full configuration.

use crate::cli::actions::{
    Action,
    server::{Args, StoreBackend},
};
use crate::cli::commands::{ARG_DSN, ARG_IN_MEMORY, ARG_PORT, auth};
use crate::api::DEFAULT_PORT;
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(ARG_PORT)
        .copied()
        .unwrap_or(DEFAULT_PORT);

    let store = if matches.get_flag(ARG_IN_MEMORY) {
        StoreBackend::Memory
    } else {
        let dsn = matches
            .get_one::<String>(ARG_DSN)
            .cloned()
            .context("missing required argument: --dsn")?;
        StoreBackend::Postgres(SecretString::from(dsn))
    };

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        store,
        jwt_secret: auth_opts.jwt_secret,
        environment: auth_opts.environment,
        client_url: auth_opts.client_url,
        client_urls: auth_opts.client_urls,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        argon2_memory_kib: auth_opts.argon2_memory_kib,
        argon2_iterations: auth_opts.argon2_iterations,
    }))
}
