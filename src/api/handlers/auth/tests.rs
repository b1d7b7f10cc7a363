//! Auth module tests.

use super::{AuthConfig, AuthError, AuthState};
use crate::store::{
    CredentialStore, DynCredentialStore, InsertOutcome, MemoryCredentialStore, NewUser,
    StoreError, User,
};
use anyhow::{Result, bail};
use async_trait::async_trait;
use secrecy::SecretString;
use session_token::{SessionClaims, SigningKey, sign_hs256};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const NOW: i64 = 1_700_000_000;

fn test_config() -> AuthConfig {
    AuthConfig::new(SecretString::from(SECRET))
        .with_argon2_memory_kib(1024)
        .with_argon2_iterations(1)
}

fn test_state() -> Result<(AuthState, Arc<MemoryCredentialStore>)> {
    let store = Arc::new(MemoryCredentialStore::new());
    let dyn_store: DynCredentialStore = store.clone();
    Ok((AuthState::new(test_config(), dyn_store)?, store))
}

#[tokio::test]
async fn register_normalizes_and_hides_secrets() -> Result<()> {
    let (state, store) = test_state()?;
    let user = state
        .service()
        .register("  Al  ", " A@B.COM ", "secret")
        .await?;

    assert_eq!(user.name, "Al");
    assert_eq!(user.email, "a@b.com");
    assert!(Uuid::parse_str(&user.id).is_ok());

    let json = serde_json::to_string(&user)?;
    assert!(!json.contains("secret"));
    assert!(!json.contains("argon2"));
    assert!(!json.contains("password"));

    let stored = store.find_by_email("a@b.com").await?;
    let Some(stored) = stored else {
        bail!("registered user missing from store");
    };
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_ne!(stored.password_hash, "secret");
    Ok(())
}

#[tokio::test]
async fn register_rejects_any_variant_of_a_taken_email() -> Result<()> {
    let (state, store) = test_state()?;
    state.service().register("Al", "a@b.com", "secret").await?;

    for variant in ["a@b.com", "A@B.COM", "  a@B.com  ", "\tA@b.Com\n"] {
        let result = state.service().register("Bo", variant, "another").await;
        assert!(
            matches!(result, Err(AuthError::Conflict)),
            "{variant:?} should conflict"
        );
    }
    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn register_validation_runs_before_the_store() -> Result<()> {
    let (state, store) = test_state()?;

    let cases = [
        ("", "a@b.com", "secret", "Name is required."),
        ("A", "a@b.com", "secret", "Name must be at least 2 characters."),
        ("Al", "", "secret", "Email is required."),
        ("Al", "a@b", "secret", "Enter a valid email address."),
        ("Al", "a@b.com", "", "Password is required."),
        ("Al", "a@b.com", "12345", "Password must be at least 6 characters."),
    ];
    for (name, email, password, message) in cases {
        match state.service().register(name, email, password).await {
            Err(AuthError::Validation(actual)) => assert_eq!(actual, message),
            other => bail!("expected validation error {message:?}, got {other:?}"),
        }
    }
    assert!(store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn login_distinguishes_unknown_email_from_wrong_password() -> Result<()> {
    let (state, _store) = test_state()?;
    state.service().register("Al", "a@b.com", "secret").await?;

    assert!(matches!(
        state.service().login("nobody@b.com", "secret").await,
        Err(AuthError::NotFound)
    ));
    assert!(matches!(
        state.service().login("a@b.com", "Secret").await,
        Err(AuthError::IncorrectPassword)
    ));
    assert!(matches!(
        state.service().login("a@b.com", "").await,
        Err(AuthError::Validation("Password is required."))
    ));
    assert!(matches!(
        state.service().login("not-an-email", "secret").await,
        Err(AuthError::Validation("Enter a valid email address."))
    ));
    Ok(())
}

#[tokio::test]
async fn login_accepts_email_variants_and_issues_a_token() -> Result<()> {
    let (state, _store) = test_state()?;
    let registered = state.service().register("Al", "a@b.com", "secret").await?;

    let outcome = state.service().login(" A@B.com ", "secret").await?;
    assert_eq!(outcome.user, registered);
    assert_eq!(outcome.token.split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn session_token_is_accepted_until_expiry() -> Result<()> {
    let (state, _store) = test_state()?;
    let registered = state.service().register("Al", "a@b.com", "secret").await?;
    let ttl = state.config().session_ttl_seconds();

    let outcome = state.service().login_at("a@b.com", "secret", NOW).await?;
    let token = Some(outcome.token.as_str());

    assert_eq!(state.service().who_am_i_at(token, NOW).await?, registered);
    assert_eq!(
        state.service().who_am_i_at(token, NOW + ttl - 1).await?,
        registered
    );
    assert!(matches!(
        state.service().who_am_i_at(token, NOW + ttl).await,
        Err(AuthError::Unauthorized)
    ));
    Ok(())
}

#[tokio::test]
async fn who_am_i_rejects_missing_and_garbage_tokens() -> Result<()> {
    let (state, _store) = test_state()?;

    for token in [None, Some(""), Some("garbage"), Some("a.b.c")] {
        assert!(matches!(
            state.service().who_am_i(token).await,
            Err(AuthError::Unauthorized)
        ));
    }
    Ok(())
}

#[tokio::test]
async fn who_am_i_rejects_tokens_signed_with_another_key() -> Result<()> {
    let (state, _store) = test_state()?;
    let user = state.service().register("Al", "a@b.com", "secret").await?;

    let foreign_key = SigningKey::new(b"some-other-secret-of-enough-size")?;
    let claims = SessionClaims::new(user.id, user.name, user.email, NOW, 3600);
    let token = sign_hs256(&foreign_key, &claims)?;

    assert!(matches!(
        state.service().who_am_i_at(Some(&token), NOW).await,
        Err(AuthError::Unauthorized)
    ));
    Ok(())
}

#[tokio::test]
async fn who_am_i_rejects_validly_signed_token_for_unknown_user() -> Result<()> {
    let (state, _store) = test_state()?;
    let key = SigningKey::new(SECRET)?;

    let ghost = SessionClaims::new(Uuid::new_v4().to_string(), "Gh", "g@b.com", NOW, 3600);
    let token = sign_hs256(&key, &ghost)?;
    assert!(matches!(
        state.service().who_am_i_at(Some(&token), NOW).await,
        Err(AuthError::Unauthorized)
    ));

    let not_a_uuid = SessionClaims::new("42", "Gh", "g@b.com", NOW, 3600);
    let token = sign_hs256(&key, &not_a_uuid)?;
    assert!(matches!(
        state.service().who_am_i_at(Some(&token), NOW).await,
        Err(AuthError::Unauthorized)
    ));
    Ok(())
}

#[tokio::test]
async fn who_am_i_reports_current_record_not_token_snapshot() -> Result<()> {
    let (state, _store) = test_state()?;
    let user = state.service().register("Al", "a@b.com", "secret").await?;
    let key = SigningKey::new(SECRET)?;

    let stale = SessionClaims::new(user.id.clone(), "Old Name", "old@b.com", NOW, 3600);
    let token = sign_hs256(&key, &stale)?;

    assert_eq!(state.service().who_am_i_at(Some(&token), NOW).await?, user);
    Ok(())
}

/// Store that fails every call, for outage behaviour.
struct UnavailableStore;

#[async_trait]
impl CredentialStore for UnavailableStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert_if_absent(&self, _user: NewUser) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn store_outage_is_unavailable_except_for_who_am_i() -> Result<()> {
    let state = AuthState::new(test_config(), Arc::new(UnavailableStore))?;

    let register = state.service().register("Al", "a@b.com", "secret").await;
    assert!(matches!(register, Err(AuthError::Store(_))));

    let login = state.service().login("a@b.com", "secret").await;
    assert!(matches!(login, Err(AuthError::Store(_))));

    let key = SigningKey::new(SECRET)?;
    let claims = SessionClaims::new(Uuid::new_v4().to_string(), "Al", "a@b.com", NOW, 3600);
    let token = sign_hs256(&key, &claims)?;
    assert!(matches!(
        state.service().who_am_i_at(Some(&token), NOW).await,
        Err(AuthError::Unauthorized)
    ));
    Ok(())
}

/// Store whose email lookup misses but whose insert reports a conflict, as
/// when another request registers the same email in between.
struct RacingStore;

#[async_trait]
impl CredentialStore for RacingStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn insert_if_absent(&self, _user: NewUser) -> Result<InsertOutcome, StoreError> {
        Ok(InsertOutcome::Conflict)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn lost_insert_race_is_a_conflict() -> Result<()> {
    let state = AuthState::new(test_config(), Arc::new(RacingStore))?;
    assert!(matches!(
        state.service().register("Al", "a@b.com", "secret").await,
        Err(AuthError::Conflict)
    ));
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_create_one_account() -> Result<()> {
    let (state, store) = test_state()?;
    let state = Arc::new(state);

    let mut handles = Vec::new();
    for index in 0..8 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            state
                .service()
                .register(&format!("User {index}"), "race@b.com", "secret")
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(AuthError::Conflict) => {}
            Err(err) => bail!("unexpected error: {err}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(store.len().await, 1);
    Ok(())
}
