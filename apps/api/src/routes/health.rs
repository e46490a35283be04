use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the versions and sizes of the loaded artifacts.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let catalog = &state.catalog;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "model": {
            "backend": state.model.backend(),
            "version": state.model_version,
        },
        "catalog": {
            "version": catalog.version,
            "education": catalog.education.len(),
            "skills": catalog.skills.len(),
            "interests": catalog.interests.len(),
            "careers": catalog.careers.len(),
        },
        "dataset_loaded": state.dataset.is_some(),
    }))
}
