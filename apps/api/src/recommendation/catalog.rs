//! Category catalogs: the label↔index mappings the model was trained against.
//!
//! The catalog artifact fixes the feature column order (`Age`, `Education`, the
//! skill labels, then the interest labels) and the meaning of every class index
//! the model emits. It is loaded once at startup and never mutated.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("catalog field '{field}' contains a blank label")]
    BlankLabel { field: &'static str },

    #[error("catalog field '{field}' lists '{label}' more than once")]
    DuplicateLabel { field: &'static str, label: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Single catalog
// ────────────────────────────────────────────────────────────────────────────

/// An ordered list of labels with an exact-match reverse index.
#[derive(Debug, Clone)]
pub struct Catalog {
    field: &'static str,
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(field: &'static str, labels: Vec<String>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(CatalogError::BlankLabel { field });
            }
            if index.insert(label.clone(), i).is_some() {
                return Err(CatalogError::DuplicateLabel {
                    field,
                    label: label.clone(),
                });
            }
        }
        Ok(Self {
            field,
            labels,
            index,
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Exact-match lookup. No case folding, no trimming.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog set
// ────────────────────────────────────────────────────────────────────────────

/// On-disk shape of `career_encoders.json`. Field names follow the training
/// dataset's column headers.
#[derive(Debug, Deserialize, Serialize)]
pub struct CatalogArtifact {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "Education")]
    pub education: Vec<String>,
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
    #[serde(rename = "Interests")]
    pub interests: Vec<String>,
    #[serde(rename = "Recommended_Career")]
    pub careers: Vec<String>,
}

/// The four catalogs shipped alongside a model.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    pub version: Option<String>,
    pub education: Catalog,
    pub skills: Catalog,
    pub interests: Catalog,
    pub careers: Catalog,
}

impl CategoryCatalog {
    pub fn from_artifact(artifact: CatalogArtifact) -> Result<Self, CatalogError> {
        let catalog = Self {
            version: artifact.version,
            education: Catalog::new("Education", artifact.education)?,
            skills: Catalog::new("Skills", artifact.skills)?,
            interests: Catalog::new("Interests", artifact.interests)?,
            careers: Catalog::new("Recommended_Career", artifact.careers)?,
        };
        // Skills or interests may legitimately be empty for a reduced model;
        // without education or career labels nothing can be encoded or ranked.
        if catalog.education.is_empty() {
            return Err(CatalogError::EmptyField("Education"));
        }
        if catalog.careers.is_empty() {
            return Err(CatalogError::EmptyField("Recommended_Career"));
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Width of the feature row the model consumes: age, education, one-hot skills, one-hot interests.
    pub fn feature_width(&self) -> usize {
        2 + self.skills.len() + self.interests.len()
    }

    /// Column names in model order.
    pub fn feature_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.feature_width());
        columns.push("Age".to_string());
        columns.push("Education".to_string());
        columns.extend(self.skills.labels().iter().cloned());
        columns.extend(self.interests.labels().iter().cloned());
        columns
    }
}
