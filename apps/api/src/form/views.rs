//! HTML page assembly for the form shell.
//!
//! Every user-supplied or catalog-supplied string goes through `escape_html`.

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::dataset::CareerDistribution;
use crate::form::FormInput;
use crate::models::profile::{title_case, DEFAULT_AGE, MAX_AGE, MIN_AGE};
use crate::recommendation::catalog::{Catalog, CategoryCatalog};
use crate::recommendation::pipeline::Recommendation;
use crate::recommendation::ranker::{format_percent, CareerMatch, ExplanationRow, TOP_N};
use crate::report::html::{escape_html, render_html};
use crate::report::{RenderedReports, ReportFormat};

pub const PAGE_TITLE: &str = "Innovigyan AI Career Recommender";
pub const NAME_PROMPT: &str = "Please enter your name to continue.";
pub const TAGLINE: &str = "Let AI guide your future based on your skills and interests.";

/// Closing rule, author link and copyright line under every page.
pub const PAGE_FOOTER: &str = "<hr>\n<footer>\n\
<p><a href=\"https://www.linkedin.com/in/wazifa-kapdi/\">Connect with me on LinkedIn</a></p>\n\
<p><small>&copy; 2025 Wazifa Kapdi | All rights reserved.</small></p>\n\
</footer>\n";

/// Rows of the training-data table shown under the form.
const INSIGHT_ROWS: usize = 10;

const STYLE: &str = "\
body{font-family:Helvetica,Arial,sans-serif;max-width:760px;margin:2em auto;color:#222}
form label{display:block;margin:.6em 0}
select[multiple]{min-width:16em;min-height:6em}
.warning{background:#fff4ce;padding:.6em}
.error{background:#fde2e1;padding:.6em}
.success{background:#dff6dd;padding:.6em}
.info{background:#e1effa;padding:.6em}
.bar{display:flex;align-items:center;margin:.3em 0}
.bar .label{width:14em}
.bar .track{flex:1;background:#eee;margin-right:.6em}
.bar .fill{display:block;height:1.2em;background:#4a7bd0}
table{border-collapse:collapse}
td,th{border:1px solid #ccc;padding:.3em .6em;text-align:left}
.preview{border:1px dashed #aaa;padding:0 1em}";

/// What happened to a submission.
pub enum Outcome {
    /// Missing or out-of-range input. Nothing ran.
    Warning(String),
    /// The pipeline failed; the message is client-safe.
    Failed { status: StatusCode, message: String },
    /// A prediction, plus the documents or the reason they are missing.
    Success {
        recommendation: Box<Recommendation>,
        reports: Result<RenderedReports, String>,
    },
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Warning(_) => StatusCode::BAD_REQUEST,
            Outcome::Failed { status, .. } => *status,
            Outcome::Success { .. } => StatusCode::OK,
        }
    }
}

/// Renders the whole page: greeting, form, optional outcome, dataset summary.
pub fn render_page(
    catalog: &CategoryCatalog,
    input: &FormInput,
    dataset: Option<&CareerDistribution>,
    outcome: Option<&Outcome>,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(PAGE_TITLE));
    body.push_str(&render_greeting(&input.name));
    body.push_str(&render_form(catalog, input));
    match outcome {
        Some(Outcome::Warning(msg)) => {
            body.push_str(&format!("<p class=\"warning\">{}</p>\n", escape_html(msg)));
        }
        Some(Outcome::Failed { message, .. }) => {
            body.push_str(&format!(
                "<p class=\"error\">Error: {}</p>\n",
                escape_html(message)
            ));
        }
        Some(Outcome::Success {
            recommendation,
            reports,
        }) => body.push_str(&render_result(recommendation, reports)),
        None => {}
    }
    if let Some(dist) = dataset {
        body.push_str(&render_insights(dist));
    }
    body.push_str(PAGE_FOOTER);

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(PAGE_TITLE)
    )
}

fn render_greeting(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return format!("<p class=\"warning\">{NAME_PROMPT}</p>\n");
    }
    format!(
        "<h2>Welcome, <b>{}</b>!</h2>\n<p>{TAGLINE}</p>\n",
        escape_html(&title_case(name))
    )
}

fn render_form(catalog: &CategoryCatalog, input: &FormInput) -> String {
    let age = match input.age.trim() {
        "" => DEFAULT_AGE.to_string(),
        raw => raw.to_string(),
    };
    let education = std::slice::from_ref(&input.education);

    let mut html = String::from("<form method=\"post\" action=\"/recommend\">\n<h3>Your Profile Details</h3>\n");
    html.push_str(&format!(
        "<label>Enter your full name <input type=\"text\" name=\"name\" value=\"{}\"></label>\n",
        escape_html(&input.name)
    ));
    html.push_str(&format!(
        "<label>Select your age <input type=\"number\" name=\"age\" min=\"{MIN_AGE}\" max=\"{MAX_AGE}\" value=\"{}\"></label>\n",
        escape_html(&age)
    ));
    html.push_str(&format!(
        "<label>Your highest education level <select name=\"education\">\n{}</select></label>\n",
        render_options(&catalog.education, education)
    ));
    html.push_str(&format!(
        "<label>Select your skills <select name=\"skills\" multiple>\n{}</select></label>\n",
        render_options(&catalog.skills, &input.skills)
    ));
    html.push_str(&format!(
        "<label>Select your interests <select name=\"interests\" multiple>\n{}</select></label>\n",
        render_options(&catalog.interests, &input.interests)
    ));
    html.push_str("<button type=\"submit\">Recommend My Career</button>\n</form>\n");
    html
}

fn render_options(catalog: &Catalog, selected: &[String]) -> String {
    catalog
        .labels()
        .iter()
        .map(|label| {
            let attr = if selected.contains(label) { " selected" } else { "" };
            let label = escape_html(label);
            format!("<option value=\"{label}\"{attr}>{label}</option>\n")
        })
        .collect()
}

fn render_result(recommendation: &Recommendation, reports: &Result<RenderedReports, String>) -> String {
    let report = &recommendation.report;
    let mut html = String::from("<section class=\"result\">\n");
    html.push_str(&format!(
        "<p class=\"success\">Recommended Career Path: <b>{}</b></p>\n",
        escape_html(&report.top_career)
    ));
    html.push_str(&format!(
        "<p class=\"info\">Match Confidence: {}</p>\n",
        format_percent(report.confidence)
    ));

    html.push_str("<h3>Download Your Career Report</h3>\n");
    match reports {
        Ok(docs) => {
            html.push_str(&download_link(ReportFormat::Pdf, &docs.pdf, "Download PDF"));
            html.push_str(&download_link(ReportFormat::Docx, &docs.docx, "Download Word"));
        }
        Err(reason) => html.push_str(&format!(
            "<p class=\"warning\">Your report could not be generated: {}</p>\n",
            escape_html(reason)
        )),
    }

    html.push_str(&format!("<h3>Top {TOP_N} Career Matches</h3>\n"));
    html.push_str(&render_chart(&recommendation.prediction.matches));
    html.push_str("<h3>Career Match Explanation</h3>\n");
    html.push_str(&render_explanation(&recommendation.explanation));
    html.push_str(&format!(
        "<h3>Report Preview</h3>\n<div class=\"preview\">\n{}</div>\n",
        render_html(report)
    ));
    html.push_str("</section>\n");
    html
}

fn download_link(format: ReportFormat, bytes: &[u8], text: &str) -> String {
    format!(
        "<p><a download=\"{}\" href=\"data:{};base64,{}\">{text}</a></p>\n",
        format.file_name(),
        format.mime_type(),
        STANDARD.encode(bytes)
    )
}

/// Horizontal bars scaled to confidence percent.
fn render_chart(matches: &[CareerMatch]) -> String {
    let mut html = String::from("<div class=\"chart\">\n");
    for m in matches {
        html.push_str(&format!(
            "<div class=\"bar\"><span class=\"label\">{}</span>\
             <span class=\"track\"><span class=\"fill\" style=\"width:{:.2}%\"></span></span>\
             <span class=\"value\">{}</span></div>\n",
            escape_html(&m.career),
            m.confidence.clamp(0.0, 100.0),
            format_percent(m.confidence)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_explanation(rows: &[ExplanationRow]) -> String {
    let mut html = String::from("<table>\n<tr><th>Career</th><th>Confidence</th><th>Reason</th></tr>\n");
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.career),
            row.confidence,
            escape_html(row.reason)
        ));
    }
    html.push_str("</table>\n");
    html
}

fn render_insights(dist: &CareerDistribution) -> String {
    let mut html = format!(
        "<h3>Careers in the Training Data</h3>\n<p>{} profiles</p>\n<table>\n\
         <tr><th>Career</th><th>Profiles</th><th>Share</th></tr>\n",
        dist.total_rows
    );
    for c in dist.careers.iter().take(INSIGHT_ROWS) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&c.career),
            c.count,
            format_percent(c.share)
        ));
    }
    html.push_str("</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::catalog::tests::sample_catalog;
    use crate::recommendation::ranker::{explain, PredictionResult};
    use crate::report::payload::tests::sample_payload;

    fn sample_recommendation() -> Recommendation {
        let prediction = PredictionResult {
            matches: vec![
                CareerMatch {
                    career: "Data Scientist".to_string(),
                    confidence: 82.0,
                },
                CareerMatch {
                    career: "Software Engineer".to_string(),
                    confidence: 10.0,
                },
                CareerMatch {
                    career: "Financial Analyst".to_string(),
                    confidence: 5.0,
                },
            ],
        };
        Recommendation {
            submission_id: uuid::Uuid::nil(),
            explanation: explain(&prediction),
            prediction,
            report: sample_payload(),
        }
    }

    fn success(reports: Result<RenderedReports, String>) -> Outcome {
        Outcome::Success {
            recommendation: Box::new(sample_recommendation()),
            reports,
        }
    }

    #[test]
    fn test_blank_name_shows_prompt() {
        let html = render_page(&sample_catalog(), &FormInput::default(), None, None);
        assert!(html.contains(NAME_PROMPT));
        assert!(!html.contains(TAGLINE));
    }

    #[test]
    fn test_named_visitor_is_welcomed() {
        let input = FormInput {
            name: "  ann lee ".to_string(),
            ..Default::default()
        };
        let html = render_page(&sample_catalog(), &input, None, None);
        assert!(html.contains("Welcome, <b>Ann Lee</b>!"));
        assert!(html.contains(TAGLINE));
        assert!(!html.contains(NAME_PROMPT));
    }

    #[test]
    fn test_form_lists_catalog_options_and_default_age() {
        let html = render_page(&sample_catalog(), &FormInput::default(), None, None);
        assert!(html.contains("<option value=\"Master&#39;s\">Master&#39;s</option>"));
        assert!(html.contains("<option value=\"Machine Learning\">"));
        assert!(html.contains("name=\"age\" min=\"16\" max=\"60\" value=\"22\""));
    }

    #[test]
    fn test_submitted_choices_stay_selected() {
        let input = FormInput {
            skills: vec!["SQL".to_string()],
            ..Default::default()
        };
        let html = render_page(&sample_catalog(), &input, None, None);
        assert!(html.contains("<option value=\"SQL\" selected>SQL</option>"));
        assert!(html.contains("<option value=\"Python\">Python</option>"));
    }

    #[test]
    fn test_success_page_sections() {
        let reports = RenderedReports {
            pdf: b"%PDF-1.3".to_vec(),
            docx: b"PK".to_vec(),
        };
        let html = render_page(
            &sample_catalog(),
            &FormInput::default(),
            None,
            Some(&success(Ok(reports))),
        );
        assert!(html.contains("Recommended Career Path: <b>Data Scientist</b>"));
        assert!(html.contains("Match Confidence: 82.00%"));
        assert!(html.contains("download=\"career_report.pdf\" href=\"data:application/pdf;base64,JVBERi0xLjM=\""));
        assert!(html.contains("download=\"career_report.docx\""));
        assert!(html.contains("style=\"width:82.00%\""));
        assert!(html.contains("<td>Great fit with educational background</td>"));
        assert!(html.contains("<h2>Career Recommendation Report</h2>"));
    }

    #[test]
    fn test_render_failure_keeps_prediction() {
        let html = render_page(
            &sample_catalog(),
            &FormInput::default(),
            None,
            Some(&success(Err("PDF rendering failed".to_string()))),
        );
        assert!(html.contains("Recommended Career Path: <b>Data Scientist</b>"));
        assert!(html.contains("could not be generated"));
        assert!(!html.contains("career_report.pdf"));
    }

    #[test]
    fn test_failure_shows_single_error_line() {
        let outcome = Outcome::Failed {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "unknown Education value 'Diploma'".to_string(),
        };
        let html = render_page(&sample_catalog(), &FormInput::default(), None, Some(&outcome));
        assert_eq!(html.matches("class=\"error\"").count(), 1);
        assert!(html.contains("Error: unknown Education value &#39;Diploma&#39;"));
        assert_eq!(outcome.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_insights_table_when_dataset_loaded() {
        let dist = CareerDistribution::from_reader(
            "Recommended_Career\nData Scientist\nData Scientist\nUX Designer\n".as_bytes(),
        )
        .unwrap();
        let html = render_page(&sample_catalog(), &FormInput::default(), Some(&dist), None);
        assert!(html.contains("<p>3 profiles</p>"));
        assert!(html.contains("<tr><td>Data Scientist</td><td>2</td><td>66.67%</td></tr>"));
    }

    #[test]
    fn test_page_carries_brand_title_and_footer() {
        let html = render_page(&sample_catalog(), &FormInput::default(), None, None);
        assert!(html.contains("<title>Innovigyan AI Career Recommender</title>"));
        assert!(html.contains("<h1>Innovigyan AI Career Recommender</h1>"));
        assert!(html.contains("Connect with me on LinkedIn</a>"));
        assert!(html.contains("&copy; 2025 Wazifa Kapdi | All rights reserved."));
        assert!(html.trim_end().ends_with("</footer>\n</body>\n</html>"));
    }
}
