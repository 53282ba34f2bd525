use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use crate::account::{RegistrationError, UserSummary, service};
use crate::api::handlers::valid_email;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegister {
    username: String,
    mail: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/user/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", body = [UserSummary], content_type = "application/json"),
        (status = 400, description = "Missing field, invalid mail address or weak password"),
        (status = 409, description = "User with the specified username or mail already exists"),
    ),
    tag= "register"
)]
// axum handler for register
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<SqlitePool>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    debug!(username = %user.username, "registration request");

    // mail shape is an HTTP-surface concern, checked before the account service runs
    if !user.mail.is_empty() && !valid_email(&user.mail) {
        return (StatusCode::BAD_REQUEST, "Invalid mail address".to_string()).into_response();
    }

    match service::register(&pool, &user.username, &user.mail, &user.password).await {
        Ok(created) => {
            (StatusCode::CREATED, Json(UserSummary::from(created))).into_response()
        }
        Err(err @ (RegistrationError::MissingField(_) | RegistrationError::WeakPassword(_))) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(
            err @ (RegistrationError::DuplicateUsername | RegistrationError::DuplicateEmail),
        ) => (StatusCode::CONFLICT, err.to_string()).into_response(),
        Err(err) => {
            error!("Error registering user: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error registering user".to_string(),
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

    fn payload(username: &str, mail: &str, password: &str) -> Option<Json<UserRegister>> {
        Some(Json(UserRegister {
            username: username.to_string(),
            mail: mail.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn created_on_valid_registration() {
        let pool = test_pool().await;
        let response = register(Extension(pool), payload("alice", "a@x.com", "Strongpw1!"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn bad_request_on_weak_password() {
        let pool = test_pool().await;
        let response = register(Extension(pool), payload("alice", "a@x.com", "password"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_request_on_missing_payload() {
        let pool = test_pool().await;
        let response = register(Extension(pool), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn conflict_on_duplicate_username() {
        let pool = test_pool().await;
        let first = register(
            Extension(pool.clone()),
            payload("alice", "a@x.com", "Strongpw1!"),
        )
        .await
        .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = register(Extension(pool), payload("alice", "b@x.com", "Strongpw1!"))
            .await
            .into_response();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
