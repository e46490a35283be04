//! Axum route handlers for the HTML form.

use axum::{extract::State, http::StatusCode, response::Html};
use axum_extra::extract::Form;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::form::views::{render_page, Outcome};
use crate::form::FormInput;
use crate::recommendation::pipeline;
use crate::report::{self, RenderedReports};
use crate::state::AppState;

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(
        &state.catalog,
        &FormInput::default(),
        state.dataset.as_deref(),
        None,
    ))
}

/// POST /recommend
///
/// Always answers with the full page; the status code mirrors the outcome.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(input): Form<FormInput>,
) -> (StatusCode, Html<String>) {
    let outcome = submit(&state, &input).await;
    let page = render_page(
        &state.catalog,
        &input,
        state.dataset.as_deref(),
        Some(&outcome),
    );
    (outcome.status(), Html(page))
}

async fn submit(state: &AppState, input: &FormInput) -> Outcome {
    let recommendation = match input.to_profile() {
        Ok(profile) => pipeline::run(state, profile).await,
        Err(e) => Err(e),
    };
    let recommendation = match recommendation {
        Ok(rec) => rec,
        Err(AppError::Validation(msg)) => return Outcome::Warning(msg),
        Err(e) => {
            if e.status().is_server_error() {
                error!("Submission failed ({}): {e:?}", e.code());
            }
            return Outcome::Failed {
                status: e.status(),
                message: e.public_message(),
            };
        }
    };

    let reports = render_reports(&recommendation.report).await;
    Outcome::Success {
        recommendation: Box::new(recommendation),
        reports,
    }
}

/// Renders both documents off the async runtime. A failure here is reported on
/// the page but never discards the prediction.
async fn render_reports(payload: &report::ReportPayload) -> Result<RenderedReports, String> {
    let payload = payload.clone();
    match tokio::task::spawn_blocking(move || report::render_all(&payload)).await {
        Ok(Ok(reports)) => Ok(reports),
        Ok(Err(e)) => {
            warn!("Report rendering failed: {e}");
            Err(e.to_string())
        }
        Err(e) => {
            warn!("Report rendering task failed: {e}");
            Err("the rendering task was aborted".to_string())
        }
    }
}
