//! API handlers.
//!
//! `auth` holds the account and session endpoints; `health` and `root` are
//! operational probes.

pub mod auth;
pub mod health;
pub mod root;
