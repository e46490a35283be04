//! Training dataset summary: visualization context only.
//!
//! The CSV the model was trained on is read once at startup and reduced to a
//! career frequency table. Nothing in the recommendation path depends on it.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

const CAREER_COLUMN: &str = "Recommended_Career";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no 'Recommended_Career' column")]
    MissingColumn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerCount {
    pub career: String,
    pub count: usize,
    /// Share of all rows, in percent.
    pub share: f64,
}

/// How often each career appears in the training data, most frequent first.
#[derive(Debug, Clone, Serialize)]
pub struct CareerDistribution {
    pub total_rows: usize,
    pub careers: Vec<CareerCount>,
}

impl CareerDistribution {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_reader(reader);
        let column = reader
            .headers()?
            .iter()
            .position(|h| h.trim() == CAREER_COLUMN)
            .ok_or(DatasetError::MissingColumn)?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total_rows = 0;
        for record in reader.records() {
            let record = record?;
            let career = record.get(column).unwrap_or("").trim();
            if career.is_empty() {
                continue;
            }
            *counts.entry(career.to_string()).or_default() += 1;
            total_rows += 1;
        }

        let mut careers: Vec<CareerCount> = counts
            .into_iter()
            .map(|(career, count)| CareerCount {
                share: count as f64 * 100.0 / total_rows as f64,
                career,
                count,
            })
            .collect();
        careers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.career.cmp(&b.career)));

        Ok(Self {
            total_rows,
            careers,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }
}
