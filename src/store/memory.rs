//! In-process credential store for local development and tests.
//!
//! Records live for the lifetime of the process. The write lock spans the
//! email check and the insert, which gives the same atomicity the PostgreSQL
//! unique index provides.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, InsertOutcome, NewUser, StoreError, User};

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_if_absent(&self, user: NewUser) -> Result<InsertOutcome, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Ok(InsertOutcome::Conflict);
        }

        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.insert(record.id, record.clone());
        Ok(InsertOutcome::Created(record))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
