use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;
use crate::recommendation::ranker::{format_percent, PredictionResult};

pub const REPORT_TITLE: &str = "Career Recommendation Report";

/// Format-agnostic snapshot of everything a downloadable report prints.
///
/// Both renderers go through [`ReportPayload::lines`], so the PDF and the DOCX
/// can never disagree on a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub clean_name: String,
    pub top_career: String,
    /// Percentage in [0, 100].
    pub confidence: f64,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

/// One labeled paragraph of a report, e.g. `Name: Ann Lee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: &'static str,
    pub value: String,
}

impl ReportPayload {
    /// Builds the payload from the submitted profile and its ranking.
    /// Returns `None` when the ranking is empty.
    pub fn new(profile: &UserProfile, prediction: &PredictionResult) -> Option<Self> {
        let top = prediction.top()?;
        Some(Self {
            clean_name: profile.clean_name(),
            top_career: top.career.clone(),
            confidence: top.confidence,
            skills: profile.skills.clone(),
            interests: profile.interests.clone(),
            generated_at: Utc::now(),
        })
    }

    /// Labeled paragraphs in print order.
    pub fn lines(&self) -> Vec<ReportLine> {
        vec![
            ReportLine {
                label: "Name",
                value: self.clean_name.clone(),
            },
            ReportLine {
                label: "Recommended Career",
                value: self.top_career.clone(),
            },
            ReportLine {
                label: "Confidence",
                value: format_percent(self.confidence),
            },
            ReportLine {
                label: "Skills",
                value: self.skills.join(", "),
            },
            ReportLine {
                label: "Interests",
                value: self.interests.join(", "),
            },
        ]
    }

    /// Footer line, e.g. `Generated on 2025-06-01 14:03 UTC`.
    pub fn footer(&self) -> String {
        format!(
            "Generated on {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
