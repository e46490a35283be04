//! The fixed HTML report template.

use crate::report::payload::{ReportPayload, REPORT_TITLE};

/// Renders the report as a standalone HTML fragment: a heading followed by one
/// bold-labeled paragraph per field.
pub fn render_html(payload: &ReportPayload) -> String {
    let mut html = format!("<h2>{}</h2>\n", escape_html(REPORT_TITLE));
    for line in payload.lines() {
        html.push_str(&format!(
            "<p><b>{}:</b> {}</p>\n",
            escape_html(line.label),
            escape_html(&line.value)
        ));
    }
    html.push_str(&format!(
        "<p><small>{}</small></p>\n",
        escape_html(&payload.footer())
    ));
    html
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::payload::tests::sample_payload;

    #[test]
    fn test_template_embeds_every_field() {
        let html = render_html(&sample_payload());
        assert!(html.starts_with("<h2>Career Recommendation Report</h2>"));
        assert!(html.contains("<p><b>Name:</b> Ann Lee</p>"));
        assert!(html.contains("<p><b>Recommended Career:</b> Data Scientist</p>"));
        assert!(html.contains("<p><b>Confidence:</b> 82.00%</p>"));
        assert!(html.contains("<p><b>Skills:</b> Python, SQL</p>"));
        assert!(html.contains("<p><b>Interests:</b> Data</p>"));
    }

    #[test]
    fn test_payload_text_is_escaped() {
        let payload = ReportPayload {
            clean_name: "<Script>Alert(1)</Script>".to_string(),
            ..sample_payload()
        };
        let html = render_html(&payload);
        assert!(!html.contains("<Script>"));
        assert!(html.contains("&lt;Script&gt;Alert(1)&lt;/Script&gt;"));
    }

    #[test]
    fn test_escape_html_quotes_and_ampersand() {
        assert_eq!(escape_html(r#"R&D "lab" 'x'"#), "R&amp;D &quot;lab&quot; &#39;x&#39;");
    }
}
