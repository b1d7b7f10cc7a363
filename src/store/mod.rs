//! Credential storage.
//!
//! User records are owned by a [`CredentialStore`]. The service layer only
//! talks to the trait, so the backing engine can be swapped without touching
//! the auth flows. Email uniqueness must be enforced by the store itself:
//! the service's look-up-then-insert is not atomic under concurrent signups.

pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// A persisted user. Emails are stored trimmed and lower-cased.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .finish()
    }
}

/// Fields required to create a user.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Outcome of [`CredentialStore::insert_if_absent`].
#[derive(Debug)]
pub enum InsertOutcome {
    Created(User),
    /// Another record already owns the email.
    Conflict,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert the user unless the email is taken. Must be atomic with respect
    /// to concurrent inserts of the same email.
    async fn insert_if_absent(&self, user: NewUser) -> Result<InsertOutcome, StoreError>;

    /// Cheap connectivity check used by health probes and startup.
    async fn ping(&self) -> Result<(), StoreError>;
}

pub type DynCredentialStore = Arc<dyn CredentialStore>;
