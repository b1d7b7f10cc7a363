//! Auth state and configuration.
//!
//! Everything derived from the environment (secret key, cookie flags, token
//! lifetime, hashing cost) is collected here once at startup and handed to
//! the service and the HTTP boundary.

use secrecy::{ExposeSecret, SecretString};
use session_token::SigningKey;
use std::{fmt, str::FromStr};

use super::{
    error::AuthError,
    password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, PasswordHasher},
    service::AuthService,
};
use crate::store::DynCredentialStore;

pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    environment: Environment,
    session_ttl_seconds: i64,
    argon2_memory_kib: u32,
    argon2_iterations: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            environment: Environment::default(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            argon2_memory_kib: DEFAULT_MEMORY_KIB,
            argon2_iterations: DEFAULT_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_argon2_memory_kib(mut self, memory_kib: u32) -> Self {
        self.argon2_memory_kib = memory_kib;
        self
    }

    #[must_use]
    pub fn with_argon2_iterations(mut self, iterations: u32) -> Self {
        self.argon2_iterations = iterations;
        self
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(crate) fn argon2_memory_kib(&self) -> u32 {
        self.argon2_memory_kib
    }

    pub(crate) fn argon2_iterations(&self) -> u32 {
        self.argon2_iterations
    }

    /// Production cookies are cross-site (`SameSite=None`) and therefore
    /// must also be `Secure`.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }

    pub(crate) fn signing_key(&self) -> Result<SigningKey, AuthError> {
        Ok(SigningKey::new(self.jwt_secret.expose_secret().as_bytes())?)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("environment", &self.environment)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .finish()
    }
}

pub struct AuthState {
    config: AuthConfig,
    service: AuthService,
}

impl AuthState {
    /// Build the auth service from configuration and a credential store.
    ///
    /// # Errors
    /// Returns an error if the secret key is too short or the hashing cost is invalid.
    pub fn new(config: AuthConfig, store: DynCredentialStore) -> Result<Self, AuthError> {
        let hasher =
            PasswordHasher::new(config.argon2_memory_kib(), config.argon2_iterations())?;
        let service = AuthService::new(
            store,
            hasher,
            config.signing_key()?,
            config.session_ttl_seconds(),
        );
        Ok(Self { config, service })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use std::sync::Arc;

    fn secret() -> SecretString {
        SecretString::from("0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(secret());

        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.session_ttl_seconds(), DEFAULT_SESSION_TTL_SECONDS);
        assert_eq!(config.argon2_memory_kib(), DEFAULT_MEMORY_KIB);
        assert_eq!(config.argon2_iterations(), DEFAULT_ITERATIONS);
        assert!(!config.session_cookie_secure());

        let config = config
            .with_environment(Environment::Production)
            .with_session_ttl_seconds(60)
            .with_argon2_memory_kib(1024)
            .with_argon2_iterations(1);

        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.session_ttl_seconds(), 60);
        assert_eq!(config.argon2_memory_kib(), 1024);
        assert_eq!(config.argon2_iterations(), 1);
        assert!(config.session_cookie_secure());
    }

    #[test]
    fn environment_parses_common_spellings() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!(" PROD ".parse(), Ok(Environment::Production));
        assert_eq!("development".parse(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", AuthConfig::new(secret()));
        assert!(!rendered.contains("0123456789abcdef"));
    }

    #[test]
    fn auth_state_rejects_short_secret() {
        let config = AuthConfig::new(SecretString::from("short"));
        let store: DynCredentialStore = Arc::new(MemoryCredentialStore::new());
        assert!(matches!(
            AuthState::new(config, store),
            Err(AuthError::Token(session_token::Error::KeyTooShort { .. }))
        ));
    }

    #[test]
    fn auth_state_rejects_invalid_hashing_cost() {
        let config = AuthConfig::new(secret()).with_argon2_iterations(0);
        let store: DynCredentialStore = Arc::new(MemoryCredentialStore::new());
        assert!(matches!(
            AuthState::new(config, store),
            Err(AuthError::PasswordHash(_))
        ));
    }
}
