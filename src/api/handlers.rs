//! Translation endpoint handler

use crate::api::error::AppError;
use crate::api::models::{TranslateRequest, TranslateResponse};
use crate::api::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

/// POST /api/v1/translate
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, AppError> {
    let Json(payload) = payload?;
    let request = payload.validate()?;

    info!(
        "Received translation request: {} -> {}, {} terms",
        request.origin_locale,
        request.destination_locale,
        request.terms.len()
    );

    let terms_translated = state
        .translator
        .translate_terms(&request.origin_locale, &request.destination_locale, &request.terms)
        .await?;

    Ok(Json(TranslateResponse { terms_translated }))
}
