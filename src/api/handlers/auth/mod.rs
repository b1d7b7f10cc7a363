//! Auth handlers and supporting modules.
//!
//! Username/password accounts with stateless cookie sessions:
//!
//! - `POST /api/auth/register` creates an account (no session).
//! - `POST /api/auth/login` verifies the password and sets the `token` cookie.
//! - `GET /api/auth/me` resolves the cookie back to the current user.
//! - `POST /api/auth/logout` clears the cookie.
//!
//! Passwords are stored as salted Argon2id PHC strings. The session cookie
//! holds an HS256 signed token with the user id, name and email; nothing
//! about the session is kept server-side, so a token stays valid until it
//! expires even after logout.

mod error;
pub(crate) mod login;
mod password;
pub(crate) mod register;
mod service;
pub(crate) mod session;
mod state;
pub(crate) mod types;
mod validation;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use service::{AuthService, LoginOutcome};
pub use state::{AuthConfig, AuthState, DEFAULT_SESSION_TTL_SECONDS, Environment};

#[cfg(test)]
mod tests;
