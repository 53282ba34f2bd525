//! # Causerie
//!
//! `causerie` is a minimal chat-application backend. It exposes HTTP endpoints
//! for user registration, login and message storage backed by SQLite.
//!
//! ## Accounts
//!
//! Passwords are checked against a strength policy (length, digit, symbol,
//! uppercase) and stored as salted Argon2id hashes; the plaintext never
//! reaches the database. Usernames and mail addresses are unique, enforced
//! both by pre-insert checks and by UNIQUE constraints as the backstop for
//! concurrent registrations.
//!
//! ## Login
//!
//! Login failures are deliberately uniform: an unknown username and a wrong
//! password produce the same error, so the API cannot be used to enumerate
//! accounts.

pub mod account;
pub mod api;
pub mod chat;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
