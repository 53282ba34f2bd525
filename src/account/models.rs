use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use utoipa::ToSchema;

/// A persisted user row.
///
/// `password_hash` holds the Argon2id PHC string, never the plaintext. The
/// struct is decoded from rows in exactly one place (the [`FromRow`] impl
/// below) with the canonical column order `id, username, mail, password`, so
/// no call site can scan columns into the wrong fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub mail: String,
    pub password_hash: String,
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            mail: row.try_get("mail")?,
            password_hash: row.try_get("password")?,
        })
    }
}

/// Outward-facing projection of a user. Omits the password hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub mail: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            mail: user.mail,
        }
    }
}
