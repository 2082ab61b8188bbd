pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::persona::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/personas", post(handlers::handle_generate))
        .route(
            "/api/v1/personas/:username/json",
            get(handlers::handle_download_json),
        )
        .route(
            "/api/v1/personas/:username/image",
            get(handlers::handle_download_image),
        )
        .with_state(state)
}
