// Report rendering: one ReportPayload, three views of it.
// HTML for the page, PDF and DOCX for download. All three print
// `ReportPayload::lines()`, never the raw payload fields.

pub mod docx;
pub mod font_metrics;
pub mod handlers;
pub mod html;
pub mod payload;
pub mod pdf;

use serde::Serialize;
use thiserror::Error;

pub use payload::ReportPayload;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("document rendering failed: {0}")]
    Document(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Docx,
}

impl ReportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "career_report.pdf",
            ReportFormat::Docx => "career_report.docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn render(self, payload: &ReportPayload) -> Result<Vec<u8>, ReportError> {
        match self {
            ReportFormat::Pdf => pdf::render_pdf(payload),
            ReportFormat::Docx => docx::render_document(payload),
        }
    }
}

/// Both downloadable documents for one submission.
#[derive(Debug, Clone)]
pub struct RenderedReports {
    pub pdf: Vec<u8>,
    pub docx: Vec<u8>,
}

pub fn render_all(payload: &ReportPayload) -> Result<RenderedReports, ReportError> {
    Ok(RenderedReports {
        pdf: ReportFormat::Pdf.render(payload)?,
        docx: ReportFormat::Docx.render(payload)?,
    })
}
