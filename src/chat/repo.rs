//! SQLite persistence for chat messages.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{Instrument, info_span};

use crate::chat::models::Message;

/// Insert a message and return it with its assigned id.
///
/// # Errors
/// Returns an error if the insert fails.
pub async fn add_message(
    pool: &SqlitePool,
    content: &str,
    sender_id: i64,
    channel_id: i64,
) -> Result<Message> {
    let query = "INSERT INTO messages (content, senderid, channelid, isdeleted) VALUES (?, ?, ?, 0)";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(content)
        .bind(sender_id)
        .bind(channel_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert message")?;

    Ok(Message {
        id: result.last_insert_rowid(),
        content: content.to_string(),
        sender_id,
        channel_id,
        is_deleted: 0,
    })
}

/// List all messages in insertion order.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn list_messages(pool: &SqlitePool) -> Result<Vec<Message>> {
    let query = "SELECT id, content, senderid, channelid, isdeleted FROM messages ORDER BY id";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_as::<_, Message>(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list messages")
}

/// List the messages a sender posted in one channel.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn list_messages_for(
    pool: &SqlitePool,
    sender_id: i64,
    channel_id: i64,
) -> Result<Vec<Message>> {
    let query = "SELECT id, content, senderid, channelid, isdeleted FROM messages \
                 WHERE senderid = ? AND channelid = ? ORDER BY id";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_as::<_, Message>(query)
        .bind(sender_id)
        .bind(channel_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list messages for sender/channel")
}
