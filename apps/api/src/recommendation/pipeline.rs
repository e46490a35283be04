//! Recommendation pipeline: the one path both the HTML form and the JSON API take.
//!
//! Flow: validate → encode → predict_distribution → rank_top3 → ReportPayload.
//!
//! Encoding and inference are CPU-bound; `run` moves them onto the blocking pool.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::recommendation::catalog::CategoryCatalog;
use crate::recommendation::encoder::encode;
use crate::recommendation::model::CareerModel;
use crate::recommendation::ranker::{explain, rank_top3, ExplanationRow, PredictionResult};
use crate::report::ReportPayload;
use crate::state::AppState;

/// Everything a successful submission displays.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub submission_id: Uuid,
    pub prediction: PredictionResult,
    pub explanation: Vec<ExplanationRow>,
    pub report: ReportPayload,
}

/// Runs the pipeline synchronously. Validation failures never reach the model.
pub fn recommend(
    profile: &UserProfile,
    catalog: &CategoryCatalog,
    model: &dyn CareerModel,
) -> Result<Recommendation, AppError> {
    profile.validate()?;

    let row = encode(profile, catalog)?;
    debug!(
        "Encoded row: {:?}",
        catalog
            .feature_columns()
            .iter()
            .zip(row.values())
            .filter(|(_, v)| **v != 0.0)
            .collect::<Vec<_>>()
    );

    let distribution = model.predict_distribution(&row)?;
    let prediction = rank_top3(&distribution, &catalog.careers)?;
    let report = ReportPayload::new(profile, &prediction)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("ranking returned no careers")))?;

    let submission_id = Uuid::new_v4();
    info!(
        "Submission {submission_id}: recommended '{}' ({:.2}%)",
        report.top_career, report.confidence
    );

    Ok(Recommendation {
        submission_id,
        explanation: explain(&prediction),
        prediction,
        report,
    })
}

/// Async entry point used by the handlers.
pub async fn run(state: &AppState, profile: UserProfile) -> Result<Recommendation, AppError> {
    let catalog = state.catalog.clone();
    let model = state.model.clone();
    tokio::task::spawn_blocking(move || recommend(&profile, &catalog, model.as_ref()))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}
