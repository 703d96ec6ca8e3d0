pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod flash;
pub mod report;
pub mod submission;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, DEFAULT_SECRET_KEY};
use crate::state::{AppState, SharedState};
use crate::storage::Storage;

pub fn build_app(config: Config) -> Router {
    if config.secret_key == DEFAULT_SECRET_KEY {
        tracing::warn!("SECRET_KEY not set, using the built-in development key");
    }

    let storage = Storage::new(&config);
    if let Err(e) = storage.ensure_dirs() {
        tracing::warn!("Could not create data directories yet: {e}");
    }

    let static_dir = config.static_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        cookie_key: flash::key_from_secret(&config.secret_key),
        storage,
        config,
    });

    Router::new()
        .merge(views::view_routes())
        .merge(routes::report_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "App is running",
    })
}
