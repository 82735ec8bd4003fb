pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        .route("/upload-cv/", post(handlers::handle_upload_cv))
        .route("/upload-cv", post(handlers::handle_upload_cv))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
