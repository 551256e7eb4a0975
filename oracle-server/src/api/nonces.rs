use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use oracle_core::events::EventChain;

use super::ApiError;
use crate::state::AppState;

/// `GET /nonces/{chain}/{key_hex}`: stored status of a dedup key.
///
/// Deposit keys are the raw nonce bytes; withdrawal keys are the decimal
/// nonce as text, so withdrawal nonce `12` is looked up as `3132`.
pub(super) async fn get_nonce_status(
    State(state): State<AppState>,
    Path((chain, key_hex)): Path<(EventChain, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let key = hex::decode(&key_hex).map_err(|_| ApiError::InvalidKey)?;

    let record = state
        .store(chain)
        .get(&key)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(record))
}
