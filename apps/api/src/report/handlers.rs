//! Axum route handlers for report downloads.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::report::{ReportFormat, ReportPayload};

/// POST /api/v1/reports/pdf
pub async fn handle_pdf(Json(payload): Json<ReportPayload>) -> Result<Response, AppError> {
    download(ReportFormat::Pdf, payload).await
}

/// POST /api/v1/reports/docx
pub async fn handle_docx(Json(payload): Json<ReportPayload>) -> Result<Response, AppError> {
    download(ReportFormat::Docx, payload).await
}

async fn download(format: ReportFormat, payload: ReportPayload) -> Result<Response, AppError> {
    if payload.clean_name.trim().is_empty() || payload.top_career.trim().is_empty() {
        return Err(AppError::Validation(
            "clean_name and top_career are required".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&payload.confidence) {
        return Err(AppError::Validation(format!(
            "confidence must be within 0–100, got {}",
            payload.confidence
        )));
    }

    let bytes = tokio::task::spawn_blocking(move || format.render(&payload))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}
