//! PDF typesetting of the report template.
//!
//! The page mirrors the HTML template: a bold title, one paragraph per field
//! with a bold inline label, and a small footer. Layout is computed first as a
//! list of placed text runs (pure, testable), then drawn with printpdf's
//! built-in Helvetica faces so no font files are needed at runtime.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::report::font_metrics::{get_metrics, PdfFont};
use crate::report::payload::{ReportPayload, REPORT_TITLE};
use crate::report::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;

const TITLE_SIZE_PT: f32 = 20.0;
const BODY_SIZE_PT: f32 = 12.0;
const FOOTER_SIZE_PT: f32 = 9.0;
/// Baseline-to-baseline distance as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.4;
const PARAGRAPH_GAP_MM: f32 = 2.5;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Code points above U+00FF that WinAnsi (Windows-1252) maps into 0x80..=0x9F.
const WIN_ANSI_EXTRA: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Whether a built-in font can draw `c`. printpdf writes built-in font text as
/// WinAnsi and drops anything outside it.
pub fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRA.contains(&c)
}

/// A single run of text at a fixed position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub page: usize,
    pub text: String,
    pub font: PdfFont,
    pub size_pt: f32,
    pub x_mm: f32,
    /// Baseline, measured from the bottom edge (PDF convention).
    pub y_mm: f32,
}

struct Cursor {
    page: usize,
    y_mm: f32,
    runs: Vec<PlacedText>,
}

impl Cursor {
    /// Advances to the next baseline, starting a new page when the bottom margin is reached.
    fn next_line(&mut self, size_pt: f32) {
        self.y_mm -= size_pt * LINE_HEIGHT * MM_PER_PT;
        if self.y_mm < MARGIN_MM {
            self.page += 1;
            self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM - size_pt * MM_PER_PT;
        }
    }

    fn place(&mut self, text: String, font: PdfFont, size_pt: f32, x_mm: f32) {
        self.runs.push(PlacedText {
            page: self.page,
            text,
            font,
            size_pt,
            x_mm,
            y_mm: self.y_mm,
        });
    }
}

/// Computes every text run of the report, in reading order.
pub fn layout(payload: &ReportPayload) -> Vec<PlacedText> {
    let text_width_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / MM_PER_PT;
    let regular = get_metrics(PdfFont::Helvetica);
    let bold = get_metrics(PdfFont::HelveticaBold);

    let mut cursor = Cursor {
        page: 0,
        y_mm: PAGE_HEIGHT_MM - MARGIN_MM - TITLE_SIZE_PT * MM_PER_PT,
        runs: Vec::new(),
    };

    for (i, line) in bold
        .wrap(REPORT_TITLE, TITLE_SIZE_PT, text_width_pt, text_width_pt)
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            cursor.next_line(TITLE_SIZE_PT);
        }
        cursor.place(line, bold.font, TITLE_SIZE_PT, MARGIN_MM);
    }
    cursor.y_mm -= PARAGRAPH_GAP_MM * 2.0;

    for field in payload.lines() {
        cursor.next_line(BODY_SIZE_PT);
        let label = format!("{}:", field.label);
        let label_w = bold.measure_str(&label, BODY_SIZE_PT) + regular.space_width * BODY_SIZE_PT;
        cursor.place(label, bold.font, BODY_SIZE_PT, MARGIN_MM);

        let wrapped = regular.wrap(&field.value, BODY_SIZE_PT, text_width_pt - label_w, text_width_pt);
        for (i, segment) in wrapped.into_iter().enumerate() {
            let x_mm = if i == 0 {
                MARGIN_MM + label_w * MM_PER_PT
            } else {
                cursor.next_line(BODY_SIZE_PT);
                MARGIN_MM
            };
            cursor.place(segment, regular.font, BODY_SIZE_PT, x_mm);
        }
        cursor.y_mm -= PARAGRAPH_GAP_MM;
    }

    cursor.next_line(BODY_SIZE_PT);
    cursor.next_line(FOOTER_SIZE_PT);
    cursor.place(payload.footer(), regular.font, FOOTER_SIZE_PT, MARGIN_MM);

    cursor.runs
}

/// Renders the report to PDF bytes.
///
/// Text the built-in fonts cannot encode is an error rather than a silently
/// shortened field, so the PDF never disagrees with the other formats.
pub fn render_pdf(payload: &ReportPayload) -> Result<Vec<u8>, ReportError> {
    let runs = layout(payload);
    if let Some(c) = runs
        .iter()
        .flat_map(|r| r.text.chars())
        .find(|c| !is_win_ansi(*c))
    {
        return Err(ReportError::Pdf(format!(
            "character '{c}' (U+{:04X}) cannot be drawn with the built-in PDF fonts",
            c as u32
        )));
    }

    let (doc, page, layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = add_font(&doc, BuiltinFont::Helvetica)?;
    let bold = add_font(&doc, BuiltinFont::HelveticaBold)?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(page).get_layer(layer)];
    for run in &runs {
        while layers.len() <= run.page {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layers.push(doc.get_page(page).get_layer(layer));
        }
        let font = match run.font {
            PdfFont::Helvetica => &regular,
            PdfFont::HelveticaBold => &bold,
        };
        layers[run.page].use_text(run.text.as_str(), run.size_pt, Mm(run.x_mm), Mm(run.y_mm), font);
    }

    doc.save_to_bytes()
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(font)
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::report::payload::tests::sample_payload;

    /// Text of page 1 as read back from the rendered bytes.
    pub(crate) fn extracted_text(bytes: &[u8]) -> String {
        lopdf::Document::load_mem(bytes)
            .unwrap()
            .extract_text(&[1])
            .unwrap()
    }

    fn text_of(runs: &[PlacedText]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_layout_prints_title_then_fields() {
        let runs = layout(&sample_payload());
        assert_eq!(runs[0].text, REPORT_TITLE);
        assert_eq!(runs[0].font, PdfFont::HelveticaBold);
        let text = text_of(&runs);
        for expected in [
            "Name: Ann Lee",
            "Recommended Career: Data Scientist",
            "Confidence: 82.00%",
            "Skills: Python, SQL",
            "Interests: Data",
            "Generated on 2025-06-01 14:03 UTC",
        ] {
            assert!(text.contains(expected), "missing '{expected}' in '{text}'");
        }
    }

    #[test]
    fn test_layout_stays_inside_margins() {
        let runs = layout(&sample_payload());
        for run in &runs {
            assert!(run.x_mm >= MARGIN_MM);
            assert!(run.y_mm >= MARGIN_MM - 1e-3 && run.y_mm <= PAGE_HEIGHT_MM - MARGIN_MM);
        }
    }

    #[test]
    fn test_layout_moves_down_the_page() {
        let runs = layout(&sample_payload());
        assert!(runs.windows(2).all(|w| w[1].page > w[0].page || w[1].y_mm <= w[0].y_mm));
    }

    #[test]
    fn test_long_skill_list_wraps_and_paginates() {
        let payload = ReportPayload {
            skills: (0..400).map(|i| format!("Skill{i}")).collect(),
            ..sample_payload()
        };
        let runs = layout(&payload);
        assert!(runs.iter().any(|r| r.page > 0), "400 skills should overflow one page");
        let text = text_of(&runs);
        assert!(text.contains("Skill0,") && text.contains("Skill399"));
    }

    #[test]
    fn test_render_pdf_produces_pdf_bytes() {
        let bytes = render_pdf(&sample_payload()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_rendered_pdf_contains_every_field() {
        let text = extracted_text(&render_pdf(&sample_payload()).unwrap());
        for line in sample_payload().lines() {
            assert!(text.contains(line.label), "missing label '{}' in '{text}'", line.label);
            assert!(text.contains(&line.value), "missing '{}' in '{text}'", line.value);
        }
        assert!(text.contains("Generated on 2025-06-01 14:03 UTC"));
    }

    #[test]
    fn test_name_outside_win_ansi_is_rejected() {
        let payload = ReportPayload {
            clean_name: "Zo\u{eb} \u{395}\u{3bb}\u{3ad}\u{3bd}\u{3b7} \u{674e}\u{96f7}".to_string(),
            ..sample_payload()
        };
        match render_pdf(&payload) {
            Err(ReportError::Pdf(msg)) => assert!(msg.contains("U+0395"), "{msg}"),
            other => panic!("expected a PDF error, got {other:?}"),
        }
    }

    #[test]
    fn test_western_european_name_renders() {
        let payload = ReportPayload {
            clean_name: "Zo\u{eb} M\u{fc}ller-\u{c5}berg".to_string(),
            ..sample_payload()
        };
        assert!(render_pdf(&payload).is_ok());
    }

    #[test]
    fn test_win_ansi_table() {
        assert!(is_win_ansi('A') && is_win_ansi('\u{e9}') && is_win_ansi('\u{20ac}'));
        assert!(!is_win_ansi('\u{395}') && !is_win_ansi('\u{674e}') && !is_win_ansi('\n'));
    }
}
