//! Compact signed session tokens.
//!
//! Tokens use the JWT compact serialization (`header.claims.signature`) with
//! an HMAC-SHA256 signature. The claims carry the user identity so the token
//! itself is the only session record; there is no server-side session table.

mod error;
mod jwt;

pub use error::Error;
pub use jwt::{SessionClaims, SessionTokenHeader, SigningKey, sign_hs256, verify_hs256};
