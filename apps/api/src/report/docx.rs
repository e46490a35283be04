use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};

use crate::report::payload::{ReportPayload, REPORT_TITLE};
use crate::report::ReportError;

const TITLE_STYLE: &str = "Title";

/// Renders the report as a Word document: a title-styled heading, one
/// paragraph per labeled field, and a footer paragraph.
pub fn render_document(payload: &ReportPayload) -> Result<Vec<u8>, ReportError> {
    let title_style = Style::new(TITLE_STYLE, StyleType::Paragraph)
        .name(TITLE_STYLE)
        .size(52)
        .bold();

    let mut docx = Docx::new().add_style(title_style).add_paragraph(
        Paragraph::new()
            .style(TITLE_STYLE)
            .add_run(Run::new().add_text(REPORT_TITLE)),
    );

    for line in payload.lines() {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("{}: ", line.label)).bold())
                .add_run(Run::new().add_text(line.value)),
        );
    }

    docx = docx.add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(payload.footer()).size(18)),
    );

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ReportError::Document(e.to_string()))?;
    Ok(buffer.into_inner())
}
