//! Ad-hoc text summarization endpoint.

use axum::{extract::State, Json};

use crate::errors::CatalogError;
use crate::handlers::AppState;
use crate::models::{GenerateSummaryRequest, GenerateSummaryResponse};

/// Generate a summary for arbitrary submitted content.
///
/// POST /api/v1/generate-summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(payload): Json<GenerateSummaryRequest>,
) -> Result<Json<GenerateSummaryResponse>, CatalogError> {
    payload.validate()?;

    let summary = state
        .generator
        .generate_book_summary(&payload.content, &payload.title)
        .await;

    Ok(Json(GenerateSummaryResponse { summary }))
}
