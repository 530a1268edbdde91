//! HTTP API handlers
//!
//! Request handlers for the Instagram operations and service metadata.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use insta_client::{InstagramError, StoryExtras, ThreadSummary};

use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Photo upload request payload
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    /// Base64-encoded image bytes
    pub image: String,
    pub username: String,
    pub password: String,
    /// Caller-supplied account identifier, keys the client cache and
    /// session file
    pub unique_id: String,
    pub caption: Option<String>,
}

/// Story upload request payload
#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    pub image: String,
    pub username: String,
    pub password: String,
    pub unique_id: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub mentions: Vec<serde_json::Value>,
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,
    #[serde(default)]
    pub links: Vec<serde_json::Value>,
    #[serde(default)]
    pub hashtags: Vec<serde_json::Value>,
    #[serde(default)]
    pub stickers: Vec<serde_json::Value>,
}

/// Thread listing request payload
#[derive(Debug, Deserialize)]
pub struct ThreadsRequest {
    pub username: String,
    pub password: String,
    pub unique_id: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub selected_filter: String,
    pub thread_message_limit: Option<u32>,
}

fn default_amount() -> u32 {
    20
}

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub media_id: String,
    pub code: String,
    pub url: String,
}

/// Successful thread listing response
#[derive(Debug, Serialize)]
pub struct ThreadsResponse {
    pub status: &'static str,
    pub threads: Vec<ThreadSummary>,
}

/// Service metadata response
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: &'static str,
    pub endpoints: serde_json::Value,
}

/// Generic API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a client error onto an HTTP status: authentication failures are
/// unauthorized, everything else is a client error carrying the original
/// message.
fn error_response(err: InstagramError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        InstagramError::Authentication(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// Handler functions
// ============================================================================

/// Service metadata endpoint
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: format!("Welcome to the {} API", state.config.app.name),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: serde_json::json!({
            "instagram_post": "/instagram/post",
            "instagram_story": "/instagram/story",
            "instagram_threads": "/instagram/threads",
        }),
    })
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Upload a photo to the feed
pub async fn post_photo(
    State(state): State<AppState>,
    Json(req): Json<PostRequest>,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Photo upload request for {}", req.unique_id);

    match state
        .handler
        .upload_photo(
            &req.unique_id,
            &req.username,
            &req.password,
            &req.image,
            req.caption.as_deref(),
        )
        .await
    {
        Ok(outcome) => Ok(Json(UploadResponse {
            status: "success",
            media_id: outcome.media_id,
            code: outcome.code,
            url: outcome.url,
        })),
        Err(e) => Err(error_response(e)),
    }
}

/// Upload a photo to the account story
pub async fn post_story(
    State(state): State<AppState>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Story upload request for {}", req.unique_id);

    let extras = StoryExtras {
        mentions: req.mentions,
        locations: req.locations,
        links: req.links,
        hashtags: req.hashtags,
        stickers: req.stickers,
    };

    match state
        .handler
        .upload_story(
            &req.unique_id,
            &req.username,
            &req.password,
            &req.image,
            req.caption.as_deref(),
            extras,
        )
        .await
    {
        Ok(outcome) => Ok(Json(UploadResponse {
            status: "success",
            media_id: outcome.media_id,
            code: outcome.code,
            url: outcome.url,
        })),
        Err(e) => Err(error_response(e)),
    }
}

/// List direct-message threads
pub async fn list_threads(
    State(state): State<AppState>,
    Json(req): Json<ThreadsRequest>,
) -> Result<Json<ThreadsResponse>, (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Thread listing request for {} (amount {})",
        req.unique_id, req.amount
    );

    match state
        .handler
        .get_direct_threads(
            &req.unique_id,
            &req.username,
            &req.password,
            req.amount,
            &req.selected_filter,
            req.thread_message_limit,
        )
        .await
    {
        Ok(threads) => Ok(Json(ThreadsResponse {
            status: "success",
            threads,
        })),
        Err(e) => Err(error_response(e)),
    }
}
