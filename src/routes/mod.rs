//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A single Axum router: `POST /upload` receives captured frames, and
//! everything else falls through to the public root as static files. That is
//! how the Show view fetches `accounts.json` and `{account}/f{i}.png`.

pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true);
    let body_limit = state.config.upload_max_bytes;

    Router::new()
        .route("/upload", post(upload::handle_upload).layer(DefaultBodyLimit::max(body_limit)))
        .route("/healthz", get(healthz))
        .fallback_service(public)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
