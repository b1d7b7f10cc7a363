//! Registration, login and session resolution.
//!
//! The service owns the credential store, the password hasher and the token
//! signing key. Handlers translate HTTP in and out; everything else lives here.

use session_token::{SessionClaims, SigningKey, sign_hs256, verify_hs256};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    error::AuthError,
    password::PasswordHasher,
    types::UserResponse,
    validation::{validate_login, validate_registration},
};
use crate::store::{DynCredentialStore, InsertOutcome, NewUser};

/// A successful login: the public user plus the signed session token.
pub struct LoginOutcome {
    pub user: UserResponse,
    pub token: String,
}

pub struct AuthService {
    store: DynCredentialStore,
    hasher: PasswordHasher,
    signing_key: SigningKey,
    session_ttl_seconds: i64,
}

impl AuthService {
    #[must_use]
    pub fn new(
        store: DynCredentialStore,
        hasher: PasswordHasher,
        signing_key: SigningKey,
        session_ttl_seconds: i64,
    ) -> Self {
        Self {
            store,
            hasher,
            signing_key,
            session_ttl_seconds,
        }
    }

    /// Create an account. Does not start a session.
    ///
    /// # Errors
    /// `Validation` for bad input, `Conflict` if the email is taken, or an
    /// infrastructure error.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserResponse, AuthError> {
        let input = validate_registration(name, email, password)?;

        if self.store.find_by_email(&input.email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hasher.hash(input.password).await?;
        let outcome = self
            .store
            .insert_if_absent(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        match outcome {
            InsertOutcome::Created(user) => {
                info!(user_id = %user.id, "User registered");
                Ok(UserResponse::from(&user))
            }
            // Lost a race against a concurrent registration for the same email.
            InsertOutcome::Conflict => Err(AuthError::Conflict),
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// `Validation`, `NotFound` for an unknown email, `IncorrectPassword`, or
    /// an infrastructure error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        self.login_at(email, password, now_unix_seconds()).await
    }

    pub(crate) async fn login_at(
        &self,
        email: &str,
        password: &str,
        now: i64,
    ) -> Result<LoginOutcome, AuthError> {
        let input = validate_login(email, password)?;

        let Some(user) = self.store.find_by_email(&input.email).await? else {
            debug!("Login rejected: unknown email");
            return Err(AuthError::NotFound);
        };

        if !self
            .hasher
            .verify(input.password, user.password_hash.clone())
            .await?
        {
            debug!(user_id = %user.id, "Login rejected: incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        let claims = SessionClaims::new(
            user.id.to_string(),
            user.name.clone(),
            user.email.clone(),
            now,
            self.session_ttl_seconds,
        );
        let token = sign_hs256(&self.signing_key, &claims)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            user: UserResponse::from(&user),
            token,
        })
    }

    /// Resolve a session token to the current user.
    ///
    /// Every failure, including a store outage, is reported as `Unauthorized`.
    ///
    /// # Errors
    /// `Unauthorized` when there is no valid session.
    pub async fn who_am_i(&self, token: Option<&str>) -> Result<UserResponse, AuthError> {
        self.who_am_i_at(token, now_unix_seconds()).await
    }

    pub(crate) async fn who_am_i_at(
        &self,
        token: Option<&str>,
        now: i64,
    ) -> Result<UserResponse, AuthError> {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Err(AuthError::Unauthorized);
        };

        let claims = verify_hs256(token, &self.signing_key, now).map_err(|err| {
            debug!("Session token rejected: {err}");
            AuthError::Unauthorized
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|err| {
            debug!("Session subject is not a user id: {err}");
            AuthError::Unauthorized
        })?;

        match self.store.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(UserResponse::from(&user)),
            Ok(None) => {
                debug!(%user_id, "Session refers to a missing user");
                Err(AuthError::Unauthorized)
            }
            Err(err) => {
                debug!("Session lookup failed: {err}");
                Err(AuthError::Unauthorized)
            }
        }
    }
}

pub(crate) fn now_unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
