//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, list_threads, post_photo, post_story, root};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Service metadata
        .route("/", get(root))
        // Health check
        .route("/health", get(health))
        // Instagram operations
        .route("/instagram/post", post(post_photo))
        .route("/instagram/story", post(post_story))
        .route("/instagram/threads", post(list_threads))
}
