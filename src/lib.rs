//! Blog backend
//!
//! REST backend for the mobile blogging app with SQLite persistence, plus the
//! listing client that keeps the app's feed in sync with its filters.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod query;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Largest accepted request body (JSON or multipart).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Routes whose writes require the API key
    let guarded_routes = Router::new()
        // Blogs
        .route("/blogs", get(api::list_blogs).post(api::create_blog))
        .route(
            "/blogs/{id}",
            get(api::get_blog)
                .put(api::update_blog)
                .delete(api::delete_blog),
        )
        // Users
        .route("/users", get(api::list_users).post(api::create_user))
        .route("/users/{id}", get(api::get_user))
        // Account
        .route("/auth/change-password", put(api::change_password))
        // Uploads
        .route("/upload/image", post(api::upload_image))
        .route("/upload/image/{filename}", delete(api::delete_image))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_write_guard(psk.clone(), req, next)
        }));

    // Identity-establishing and probe routes (no auth required)
    let open_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/health", get(api::health_check));

    Router::new()
        .nest("/api", guarded_routes.merge(open_routes))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
