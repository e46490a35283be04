use axum::{extract::State, Json};

use crate::dataset::CareerDistribution;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/insights
/// Career frequencies in the training data, most common first.
pub async fn insights_handler(
    State(state): State<AppState>,
) -> Result<Json<CareerDistribution>, AppError> {
    let dataset = state
        .dataset
        .as_deref()
        .ok_or_else(|| AppError::NotFound("No training dataset is loaded".to_string()))?;
    Ok(Json(dataset.clone()))
}
