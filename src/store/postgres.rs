//! PostgreSQL credential store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    Connection, PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use std::time::Duration;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::{CredentialStore, InsertOutcome, NewUser, StoreError, User};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be reached.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    /// Create the `users` table and its unique email index if missing.
    ///
    /// # Errors
    /// Returns an error if any schema statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            let span = info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "DDL",
                db.statement = statement.as_str()
            );
            sqlx::query(statement)
                .execute(&self.pool)
                .instrument(span)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, name, email, password_hash FROM users WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, name, email, password_hash FROM users WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_if_absent(&self, user: NewUser) -> Result<InsertOutcome, StoreError> {
        // The unique index on email makes this atomic; a concurrent insert
        // either hits ON CONFLICT or surfaces as a 23505 unique violation.
        let query = r"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, password_hash
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(Some(row)) => Ok(InsertOutcome::Created(user_from_row(&row))),
            Ok(None) => Ok(InsertOutcome::Conflict),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        current.push_str(line);
        current.push('\n');

        if line.trim().ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}
