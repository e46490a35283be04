//! Top-N ranking of the model's probability distribution.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::recommendation::catalog::Catalog;

pub const TOP_N: usize = 3;

/// Fixed explanation text per rank, in rank order.
pub const RANK_REASONS: [&str; TOP_N] = [
    "Strong match with your skill & interest set",
    "Great fit with educational background",
    "Alternative path based on overlapping traits",
];

/// Tolerance on the distribution summing to 1.0 before a warning is logged.
const SUM_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("career catalog is empty; nothing to rank")]
    InsufficientLabels,

    #[error("invalid probability distribution: {0}")]
    InvalidDistribution(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatch {
    pub career: String,
    /// Probability × 100, in [0, 100].
    pub confidence: f64,
}

/// Ranked matches, best first. Exactly `TOP_N` entries unless the career
/// catalog is smaller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub matches: Vec<CareerMatch>,
}

impl PredictionResult {
    pub fn top(&self) -> Option<&CareerMatch> {
        self.matches.first()
    }
}

/// One row of the explanation table shown under the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationRow {
    pub career: String,
    /// Two-decimal percentage, e.g. `"82.00%"`.
    pub confidence: String,
    pub reason: &'static str,
}

/// Pairs each ranked match with its fixed reason text.
pub fn explain(result: &PredictionResult) -> Vec<ExplanationRow> {
    result
        .matches
        .iter()
        .zip(RANK_REASONS)
        .map(|(m, reason)| ExplanationRow {
            career: m.career.clone(),
            confidence: format_percent(m.confidence),
            reason,
        })
        .collect()
}

pub fn format_percent(confidence: f64) -> String {
    format!("{confidence:.2}%")
}

/// Picks the three most probable careers.
///
/// Ties on exact probability go to the lower catalog index. A catalog with fewer
/// than three labels yields all of them, ranked; an empty catalog is an error.
pub fn rank_top3(distribution: &[f64], careers: &Catalog) -> Result<PredictionResult, RankError> {
    if careers.is_empty() {
        return Err(RankError::InsufficientLabels);
    }
    if distribution.len() != careers.len() {
        return Err(RankError::InvalidDistribution(format!(
            "{} probabilities for {} career labels",
            distribution.len(),
            careers.len()
        )));
    }
    if let Some(i) = distribution
        .iter()
        .position(|p| !p.is_finite() || *p < 0.0 || *p > 1.0)
    {
        return Err(RankError::InvalidDistribution(format!(
            "probability {} at index {i} is outside [0, 1]",
            distribution[i]
        )));
    }

    let total: f64 = distribution.iter().sum();
    if (total - 1.0).abs() > SUM_TOLERANCE {
        warn!("Model distribution sums to {total:.6}, expected 1.0");
    }
    if careers.len() < TOP_N {
        warn!(
            "Career catalog has {} labels; returning fewer than {TOP_N} matches",
            careers.len()
        );
    }

    let mut order: Vec<usize> = (0..distribution.len()).collect();
    // Values are finite here, so partial_cmp never fails; index breaks ties.
    order.sort_by(|&a, &b| {
        distribution[b]
            .partial_cmp(&distribution[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let matches = order
        .into_iter()
        .take(TOP_N)
        .filter_map(|i| {
            careers.label_at(i).map(|label| CareerMatch {
                career: label.to_string(),
                confidence: distribution[i] * 100.0,
            })
        })
        .collect();

    Ok(PredictionResult { matches })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn careers(labels: &[&str]) -> Catalog {
        Catalog::new(
            "Recommended_Career",
            labels.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    fn four() -> Catalog {
        careers(&["Data Scientist", "Graphic Designer", "Software Engineer", "Financial Analyst"])
    }

    #[test]
    fn test_top_three_sorted_descending() {
        let result = rank_top3(&[0.10, 0.05, 0.60, 0.25], &four()).unwrap();
        let names: Vec<&str> = result.matches.iter().map(|m| m.career.as_str()).collect();
        assert_eq!(names, ["Software Engineer", "Financial Analyst", "Data Scientist"]);
        assert!(result
            .matches
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_top_match_scenario_formats_82_percent() {
        let result = rank_top3(&[0.82, 0.03, 0.10, 0.05], &four()).unwrap();
        let top = result.top().unwrap();
        assert_eq!(top.career, "Data Scientist");
        assert_eq!(format_percent(top.confidence), "82.00%");
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let result = rank_top3(&[0.25, 0.25, 0.25, 0.25], &four()).unwrap();
        let names: Vec<&str> = result.matches.iter().map(|m| m.career.as_str()).collect();
        assert_eq!(names, ["Data Scientist", "Graphic Designer", "Software Engineer"]);

        let result = rank_top3(&[0.1, 0.3, 0.3, 0.3], &four()).unwrap();
        let names: Vec<&str> = result.matches.iter().map(|m| m.career.as_str()).collect();
        assert_eq!(names, ["Graphic Designer", "Software Engineer", "Financial Analyst"]);
    }

    #[test]
    fn test_confidences_within_bounds() {
        let result = rank_top3(&[1.0, 0.0, 0.0, 0.0], &four()).unwrap();
        assert_eq!(result.matches.len(), 3);
        for m in &result.matches {
            assert!((0.0..=100.0).contains(&m.confidence));
        }
        assert_eq!(result.matches[0].confidence, 100.0);
    }

    #[test]
    fn test_small_catalog_degrades_to_all_labels() {
        let result = rank_top3(&[0.3, 0.7], &careers(&["Nurse", "Teacher"])).unwrap();
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].career, "Teacher");
    }

    #[test]
    fn test_empty_catalog_is_insufficient_labels() {
        let empty = careers(&[]);
        assert_eq!(rank_top3(&[], &empty), Err(RankError::InsufficientLabels));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(matches!(
            rank_top3(&[0.5, 0.5], &four()),
            Err(RankError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_nan_and_negative_rejected() {
        for bad in [f64::NAN, -0.1, 1.5] {
            assert!(matches!(
                rank_top3(&[bad, 0.5, 0.25, 0.25], &four()),
                Err(RankError::InvalidDistribution(_))
            ));
        }
    }

    #[test]
    fn test_explain_attaches_fixed_reasons() {
        let result = rank_top3(&[0.82, 0.03, 0.10, 0.05], &four()).unwrap();
        let rows = explain(&result);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].confidence, "82.00%");
        assert_eq!(rows[0].reason, "Strong match with your skill & interest set");
        assert_eq!(rows[1].career, "Software Engineer");
        assert_eq!(rows[1].reason, "Great fit with educational background");
        assert_eq!(rows[2].reason, "Alternative path based on overlapping traits");
    }
}
