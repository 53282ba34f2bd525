use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use crate::account::{AuthError, UserSummary, service};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLogin {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/user/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = [UserSummary], content_type = "application/json"),
        (status = 401, description = "Unauthorized"),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<SqlitePool>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    debug!(username = %user.username, "login request");

    match service::authenticate(&pool, &user.username, &user.password).await {
        Ok(record) => (StatusCode::OK, Json(UserSummary::from(record))).into_response(),

        // One message for unknown user and wrong password alike.
        Err(AuthError::InvalidCredentials) => {
            debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response()
        }

        Err(err) => {
            error!("Error verifying credentials: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error verifying credentials".to_string(),
            )
                .into_response()
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

    fn payload(username: &str, password: &str) -> Option<Json<UserLogin>> {
        Some(Json(UserLogin {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn ok_with_summary_on_valid_login() {
        let pool = test_pool().await;
        register(&pool, "dave", "d@x.com", "Strongpw1!").await.unwrap();

        let response = login(Extension(pool), payload("dave", "Strongpw1!"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let summary: UserSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.username, "dave");
        assert_eq!(summary.mail, "d@x.com");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_get_the_same_response() {
        let pool = test_pool().await;
        register(&pool, "alice", "a@x.com", "Strongpw1!").await.unwrap();

        let unknown = login(Extension(pool.clone()), payload("nouser", "anything"))
            .await
            .into_response();
        let wrong = login(Extension(pool), payload("alice", "wrongpw"))
            .await
            .into_response();

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let unknown_body = to_bytes(unknown.into_body(), usize::MAX).await.unwrap();
        let wrong_body = to_bytes(wrong.into_body(), usize::MAX).await.unwrap();
        assert_eq!(unknown_body, wrong_body);
    }
}
