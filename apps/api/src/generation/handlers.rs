//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::generate_variations;
use crate::generation::models::{GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// POST /api/generate
///
/// Rewrites every submitted activity into Common App and UC variants with one
/// upstream call. An empty, missing, or unparseable activity list is a 400,
/// as is a body sent without `Content-Type: application/json`.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;

    let activities = request.activities.unwrap_or_default();
    if activities.is_empty() {
        return Err(AppError::Validation("No activities provided".to_string()));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, "Generate request with {} activities", activities.len());

    let response = generate_variations(state.generator.as_ref(), &activities).await?;

    info!(%request_id, "Generate request completed");
    Ok(Json(response))
}
