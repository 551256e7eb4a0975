//! Oracle API handlers.
//!
//! # Endpoints
//!
//! - `POST /events/{chain}`           – publish a raw contract event into a chain's queue
//! - `GET  /nonces/{chain}/{key_hex}` – inspect the stored status of a dedup key

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use oracle_core::store::StoreError;

use crate::state::AppState;

mod events;
mod nonces;

/// Build the oracle API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{chain}", post(events::publish_event))
        .route("/nonces/{chain}/{key_hex}", get(nonces::get_nonce_status))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
enum ApiError {
    /// The chain's event queue is no longer consumed.
    QueueClosed,
    /// The key in the path is not hex.
    InvalidKey,
    /// No status is stored for the key.
    NotFound,
    /// The nonce status store failed or holds an unreadable record.
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::QueueClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, "event queue is closed").into_response()
            }
            ApiError::InvalidKey => {
                (StatusCode::BAD_REQUEST, "key must be hex encoded").into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "nonce not found").into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Nonce status store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
