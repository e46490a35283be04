//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::recommendation::pipeline::{self, Recommendation};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub version: Option<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub careers: Vec<String>,
}

/// GET /api/v1/catalog
///
/// The option lists a client must choose from. Values outside these lists are
/// rejected with UNKNOWN_CATEGORY.
pub async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = &state.catalog;
    Json(CatalogResponse {
        version: catalog.version.clone(),
        education: catalog.education.labels().to_vec(),
        skills: catalog.skills.labels().to_vec(),
        interests: catalog.interests.labels().to_vec(),
        careers: catalog.careers.labels().to_vec(),
    })
}

/// POST /api/v1/recommendations
///
/// Runs the full pipeline for one profile. The returned `report` payload can be
/// posted to `/api/v1/reports/{pdf,docx}` to download the documents.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<Recommendation>, AppError> {
    let recommendation = pipeline::run(&state, profile).await?;
    Ok(Json(recommendation))
}
