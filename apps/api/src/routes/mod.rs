pub mod health;
pub mod insights;

use axum::{
    routing::{get, post},
    Router,
};

use crate::form;
use crate::recommendation;
use crate::report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML form
        .route("/", get(form::handlers::handle_index))
        .route("/recommend", post(form::handlers::handle_submit))
        // Recommendation API
        .route(
            "/api/v1/catalog",
            get(recommendation::handlers::handle_catalog),
        )
        .route(
            "/api/v1/recommendations",
            post(recommendation::handlers::handle_recommend),
        )
        // Report downloads
        .route("/api/v1/reports/pdf", post(report::handlers::handle_pdf))
        .route("/api/v1/reports/docx", post(report::handlers::handle_docx))
        .route("/api/v1/insights", get(insights::insights_handler))
        .with_state(state)
}
