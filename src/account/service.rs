//! Registration and login validation.
//!
//! Both flows treat the database as the sole source of truth; there is no
//! process-wide user cache. Registration validates before inserting
//! (required fields, strength policy, uniqueness) and relies on the store's
//! UNIQUE constraints when two registrations race past the checks.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::account::{
    hasher::{self, HashError},
    models::User,
    policy::{self, PolicyReason},
    repo::{self, StoreError, UserField},
};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("password too weak: {0}")]
    WeakPassword(PolicyReason),
    #[error("username already taken")]
    DuplicateUsername,
    #[error("mail address already in use")]
    DuplicateEmail,
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error(transparent)]
    Store(StoreError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password collapse into this one variant so
    /// the response cannot be used to enumerate accounts.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate and persist a new account.
///
/// Order of checks: required fields, password policy, username uniqueness,
/// mail uniqueness, hash, insert. Exactly one insertion on success, none on
/// any rejection.
///
/// # Errors
/// Returns the first failing check as a [`RegistrationError`]; a unique
/// violation raised by the insert itself (lost race) maps to the same
/// duplicate errors as the pre-insert checks.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    mail: &str,
    password: &str,
) -> Result<User, RegistrationError> {
    for (value, name) in [(username, "username"), (mail, "mail"), (password, "password")] {
        if value.is_empty() {
            return Err(RegistrationError::MissingField(name));
        }
    }

    let verdict = policy::evaluate(password);
    if !verdict.accepted {
        return Err(RegistrationError::WeakPassword(verdict.reason));
    }

    if repo::count_where(pool, UserField::Username, username)
        .await
        .map_err(RegistrationError::Store)?
        > 0
    {
        return Err(RegistrationError::DuplicateUsername);
    }

    if repo::count_where(pool, UserField::Mail, mail)
        .await
        .map_err(RegistrationError::Store)?
        > 0
    {
        return Err(RegistrationError::DuplicateEmail);
    }

    let password_hash = hasher::hash(password)?;

    let user = repo::insert(pool, username, mail, &password_hash)
        .await
        .map_err(|err| match err {
            StoreError::UniqueViolation {
                field: UserField::Username,
            } => RegistrationError::DuplicateUsername,
            StoreError::UniqueViolation {
                field: UserField::Mail,
            } => RegistrationError::DuplicateEmail,
            other => RegistrationError::Store(other),
        })?;

    debug!(username, id = user.id, "user registered");

    Ok(user)
}

/// Verify a username/password pair against the store.
///
/// # Errors
/// Returns [`AuthError::InvalidCredentials`] for an unknown username or a
/// wrong password, indistinguishably. A malformed stored hash or a store
/// failure propagates as an internal error.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let Some(user) = repo::find_by_username(pool, username).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    if !hasher::verify(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    debug!(username, id = user.id, "login verified");

    Ok(user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::account::repo::tests::test_pool;

    #[tokio::test]
    async fn register_then_authenticate() {
        let pool = test_pool().await;
        let created = register(&pool, "dave", "d@x.com", "Strongpw1!").await.unwrap();
        assert_eq!(created.username, "dave");
        assert_eq!(created.mail, "d@x.com");
        assert!(!created.password_hash.is_empty());
        assert_ne!(created.password_hash, "Strongpw1!");

        let authed = authenticate(&pool, "dave", "Strongpw1!").await.unwrap();
        assert_eq!(authed, created);
    }

    #[tokio::test]
    async fn missing_fields_rejected_before_anything_else() {
        let pool = test_pool().await;
        for (username, mail, password, field) in [
            ("", "a@x.com", "Strongpw1!", "username"),
            ("alice", "", "Strongpw1!", "mail"),
            ("alice", "a@x.com", "", "password"),
        ] {
            let err = register(&pool, username, mail, password).await.unwrap_err();
            assert!(matches!(err, RegistrationError::MissingField(f) if f == field));
        }
        assert_eq!(repo::list(&pool).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn weak_password_rejected_without_insert() {
        let pool = test_pool().await;
        let err = register(&pool, "alice", "a@x.com", "password").await.unwrap_err();
        assert!(matches!(err, RegistrationError::WeakPassword(_)));
        assert_eq!(repo::list(&pool).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let pool = test_pool().await;
        register(&pool, "alice", "a@x.com", "Weakpw1!").await.unwrap();

        let err = register(&pool, "alice", "b@x.com", "Weakpw1!")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateUsername));
        assert_eq!(repo::list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_mail_rejected() {
        let pool = test_pool().await;
        register(&pool, "bob", "dup@x.com", "Weakpw1!").await.unwrap();

        let err = register(&pool, "carol", "dup@x.com", "Weakpw1!")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEmail));
        assert_eq!(repo::list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let pool = test_pool().await;
        register(&pool, "alice", "a@x.com", "Strongpw1!").await.unwrap();

        let unknown = authenticate(&pool, "nouser", "anything").await.unwrap_err();
        let wrong = authenticate(&pool, "alice", "wrongpw").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_an_internal_error() {
        let pool = test_pool().await;
        repo::insert(&pool, "mallory", "m@x.com", "not-a-phc-string")
            .await
            .unwrap();

        let err = authenticate(&pool, "mallory", "Strongpw1!").await.unwrap_err();
        assert!(matches!(err, AuthError::Hashing(HashError::MalformedHash)));
    }
}
