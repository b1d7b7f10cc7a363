use crate::{
    api::{
        self, ServerConfig,
        handlers::auth::{AuthConfig, AuthState, Environment},
    },
    store::{DynCredentialStore, MemoryCredentialStore, PgCredentialStore},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where user records live.
#[derive(Debug)]
pub enum StoreBackend {
    Postgres(SecretString),
    Memory,
}

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store: StoreBackend,
    pub jwt_secret: SecretString,
    pub environment: Environment,
    pub client_url: String,
    pub client_urls: Vec<String>,
    pub session_ttl_seconds: i64,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store is unreachable, the auth configuration is
/// invalid, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store = open_store(args.store).await?;

    store
        .ping()
        .await
        .context("Credential store is unreachable")?;

    let auth_config = AuthConfig::new(args.jwt_secret)
        .with_environment(args.environment)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_argon2_memory_kib(args.argon2_memory_kib)
        .with_argon2_iterations(args.argon2_iterations);

    let auth_state = Arc::new(
        AuthState::new(auth_config, store.clone()).context("Invalid auth configuration")?,
    );

    let server = ServerConfig::new(args.port)
        .with_environment(args.environment)
        .with_client_url(args.client_url)
        .with_client_urls(args.client_urls);

    info!(
        environment = %server.environment(),
        origins = ?server.client_urls(),
        "Starting server"
    );

    api::new(server, auth_state, store).await
}

async fn open_store(backend: StoreBackend) -> Result<DynCredentialStore> {
    match backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory credential store; accounts are lost on restart");
            Ok(Arc::new(MemoryCredentialStore::new()))
        }
        StoreBackend::Postgres(dsn) => {
            let store = PgCredentialStore::connect(dsn.expose_secret()).await?;
            store
                .ensure_schema()
                .await
                .context("Failed to create database schema")?;
            info!("Database schema is ready");
            Ok(Arc::new(store))
        }
    }
}
