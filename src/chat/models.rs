use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use utoipa::ToSchema;

/// A stored chat message. Deletion is a soft flag, kept as 0/1 in the row.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    #[serde(rename = "senderid")]
    pub sender_id: i64,
    #[serde(rename = "channelid")]
    pub channel_id: i64,
    #[serde(rename = "isdeleted")]
    pub is_deleted: i64,
}

impl<'r> FromRow<'r, SqliteRow> for Message {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            sender_id: row.try_get("senderid")?,
            channel_id: row.try_get("channelid")?,
            is_deleted: row.try_get("isdeleted")?,
        })
    }
}
