use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{error, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::chat::{Message, repo};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct NewMessage {
    content: String,
    #[serde(rename = "senderid")]
    sender_id: i64,
    #[serde(rename = "channelid")]
    channel_id: i64,
}

/// Optional sender/channel filter; both must be given to filter.
#[derive(IntoParams, Deserialize, Debug)]
pub struct MessageFilter {
    #[serde(rename = "senderid")]
    sender_id: Option<i64>,
    #[serde(rename = "channelid")]
    channel_id: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/messages",
    request_body = NewMessage,
    responses(
        (status = 201, description = "Message stored", body = [Message], content_type = "application/json"),
        (status = 400, description = "Empty content"),
    ),
    tag = "messages"
)]
#[instrument(skip_all)]
pub async fn add_message(
    pool: Extension<SqlitePool>,
    payload: Option<Json<NewMessage>>,
) -> impl IntoResponse {
    let message: NewMessage = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if message.content.is_empty() {
        return (StatusCode::BAD_REQUEST, "Empty content".to_string()).into_response();
    }

    match repo::add_message(&pool, &message.content, message.sender_id, message.channel_id).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => {
            error!("Error storing message: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error storing message".to_string(),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/messages",
    params(MessageFilter),
    responses(
        (status = 200, description = "Messages, optionally filtered by sender and channel", body = [Message]),
    ),
    tag = "messages"
)]
pub async fn list_messages(
    Query(filter): Query<MessageFilter>,
    pool: Extension<SqlitePool>,
) -> impl IntoResponse {
    let result = match (filter.sender_id, filter.channel_id) {
        (Some(sender_id), Some(channel_id)) => {
            repo::list_messages_for(&pool, sender_id, channel_id).await
        }
        _ => repo::list_messages(&pool).await,
    };

    match result {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => {
            error!("Error listing messages: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
