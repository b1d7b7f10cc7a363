//! # Userregis
//!
//! Username/password accounts with signed cookie sessions.
//!
//! ## Flows
//!
//! - **Register:** name, email and password are validated, the email is
//!   normalized (trimmed, lower-cased) and must be unique, and the password is
//!   stored as a salted Argon2id hash. Registration does not log the user in.
//! - **Login:** an unknown email is reported as `404` and a wrong password as
//!   `401`, so the client can tell the two apart. On success an HS256 session
//!   token is set in an `HttpOnly` cookie named `token`.
//! - **Me:** the cookie is verified and the user re-read from the store.
//!   Any failure is a plain `401 Unauthorized`.
//! - **Logout:** clears the cookie. Sessions are not tracked server-side, so
//!   an already issued token remains valid until it expires.
//!
//! ## Storage
//!
//! Records live behind the [`store::CredentialStore`] trait: PostgreSQL in
//! production, or an in-process map with `--in-memory` for local development.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
