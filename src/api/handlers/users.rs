//! User listing and explicit deletion.
//!
//! Deletion is the only way a user record leaves the store; records are
//! never updated in place.

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use tracing::error;

use crate::account::{UserSummary, repo};

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List all users, password hashes omitted", body = [UserSummary]),
    ),
    tag = "users"
)]
pub async fn list_users(pool: Extension<SqlitePool>) -> impl IntoResponse {
    match repo::list(&pool).await {
        Ok(users) => {
            let summaries: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(err) => {
            error!("Failed to list users: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No user with this id"),
    ),
    tag = "users"
)]
pub async fn delete_user(Path(id): Path<i64>, pool: Extension<SqlitePool>) -> impl IntoResponse {
    match repo::delete(&pool, id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to delete user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::account::repo::tests::test_pool;
    use crate::account::service::register;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn listing_omits_password_hashes() {
        let pool = test_pool().await;
        register(&pool, "alice", "a@x.com", "Strongpw1!").await.unwrap();

        let response = list_users(Extension(pool)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["username"], "alice");
        assert!(json[0].get("password").is_none());
        assert!(json[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn delete_then_404_on_second_attempt() {
        let pool = test_pool().await;
        let user = register(&pool, "alice", "a@x.com", "Strongpw1!").await.unwrap();

        let first = delete_user(Path(user.id), Extension(pool.clone()))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = delete_user(Path(user.id), Extension(pool))
            .await
            .into_response();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }
}
