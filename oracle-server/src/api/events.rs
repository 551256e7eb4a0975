use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use oracle_core::events::EventChain;
use serde::Serialize;

use super::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
struct PublishResponse {
    offset: u64,
}

/// `POST /events/{chain}`: publish a raw contract event.
///
/// The body is queued as-is; classification and validation happen in the
/// chain's event loop.
pub(super) async fn publish_event(
    State(state): State<AppState>,
    Path(chain): Path<EventChain>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let offset = state
        .publisher(chain)
        .publish(None, body)
        .await
        .map_err(|_| ApiError::QueueClosed)?;

    tracing::debug!(%chain, offset, "Event published");
    Ok((StatusCode::ACCEPTED, Json(PublishResponse { offset })))
}
