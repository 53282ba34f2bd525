//! SQLite persistence for user accounts.
//!
//! The UNIQUE constraints on `username` and `mail` are the correctness
//! backstop for concurrent registrations: the service layer checks
//! uniqueness before inserting, but a race between check and insert still
//! surfaces here as [`StoreError::UniqueViolation`].

use sqlx::{SqlitePool, error::ErrorKind};
use thiserror::Error;
use tracing::{Instrument, info_span};

use crate::account::models::User;

/// User columns that carry a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Username,
    Mail,
}

impl UserField {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Mail => "mail",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} already taken", field.column())]
    UniqueViolation { field: UserField },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create the schema if it does not exist yet.
///
/// # Errors
/// Returns an error if any DDL statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            mail TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            senderid INTEGER NOT NULL,
            channelid INTEGER NOT NULL,
            isdeleted INTEGER NOT NULL DEFAULT 0
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS channels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            about TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a new user and return the stored row with its assigned id.
///
/// # Errors
/// Returns [`StoreError::UniqueViolation`] when `username` or `mail` is
/// already taken, [`StoreError::Database`] for anything else.
pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    mail: &str,
    password_hash: &str,
) -> Result<User, StoreError> {
    let query = "INSERT INTO users (username, mail, password) VALUES (?, ?, ?)";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(username)
        .bind(mail)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .map_err(classify)?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        mail: mail.to_string(),
        password_hash: password_hash.to_string(),
    })
}

/// Count users matching `value` in the given column.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn count_where(
    pool: &SqlitePool,
    field: UserField,
    value: &str,
) -> Result<i64, StoreError> {
    let query = match field {
        UserField::Username => "SELECT COUNT(*) FROM users WHERE username = ?",
        UserField::Mail => "SELECT COUNT(*) FROM users WHERE mail = ?",
    };
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let count: i64 = sqlx::query_scalar(query)
        .bind(value)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(count)
}

/// Look up a user by username.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, StoreError> {
    let query = "SELECT id, username, mail, password FROM users WHERE username = ?";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let user = sqlx::query_as::<_, User>(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(user)
}

/// List all users in insertion order.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, StoreError> {
    let query = "SELECT id, username, mail, password FROM users ORDER BY id";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let users = sqlx::query_as::<_, User>(query)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(users)
}

/// Delete a user by id. Returns `true` when a row was removed.
///
/// # Errors
/// Returns an error if the statement fails.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let query = "DELETE FROM users WHERE id = ?";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Map a raw sqlx error to a typed store error. SQLite reports which
// constraint fired in the message ("UNIQUE constraint failed: users.mail").
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.kind(), ErrorKind::UniqueViolation) {
            let message = db_err.message();
            if message.contains("users.username") {
                return StoreError::UniqueViolation {
                    field: UserField::Username,
                };
            }
            if message.contains("users.mail") {
                return StoreError::UniqueViolation {
                    field: UserField::Mail,
                };
            }
        }
    }
    StoreError::Database(err)
}
