use crate::{
    account,
    api::handlers::{
        health, health::__path_health, messages, messages::__path_add_message,
        messages::__path_list_messages, user_login, user_login::__path_login, user_register,
        user_register::__path_register, users::__path_delete_user, users::__path_list_users,
    },
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(health, register, login, list_users, delete_user, add_message, list_messages),
    components(schemas(
        health::Health,
        user_register::UserRegister,
        user_login::UserLogin,
        account::UserSummary,
        messages::NewMessage,
        crate::chat::Message,
    )),
    tags(
        (name = "causerie", description = "Minimal chat backend API")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String) -> Result<()> {
    // Connect to database, creating the file on first start
    let options = SqliteConnectOptions::from_str(&dsn)
        .context("Invalid database DSN")?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    account::repo::migrate(&pool)
        .await
        .context("Failed to create database schema")?;

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any);

    let app = Router::new()
        .route("/", get(|| async { "💬" }))
        .route("/user/register", post(handlers::register))
        .route("/user/login", post(handlers::login))
        .route("/users", get(handlers::list_users))
        .route("/users/:id", delete(handlers::delete_user))
        .route(
            "/messages",
            get(handlers::list_messages).post(handlers::add_message),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(pool.clone())),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(Extension(pool));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_all_routes() {
        let doc = openapi();
        let paths = doc.paths.paths;
        for route in [
            "/health",
            "/user/register",
            "/user/login",
            "/users",
            "/users/{id}",
            "/messages",
        ] {
            assert!(paths.contains_key(route), "missing route: {route}");
        }
    }
}
