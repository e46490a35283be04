//! Career model: the opaque classifier behind `predict_distribution`.
//!
//! The trained model is exported to a JSON artifact tagged by `kind`. Two
//! backends are supported:
//! - `random_forest`: scikit-learn style forest; probability = mean over trees of
//!   the normalized leaf class weights.
//! - `logistic`: multinomial logistic regression; probability = softmax of the
//!   linear class scores.
//!
//! `AppState` holds an `Arc<dyn CareerModel>`, chosen by the artifact at startup.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::recommendation::encoder::FeatureRow;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Schema(String),

    #[error("feature row has width {got}, model expects {expected}")]
    RowWidth { expected: usize, got: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A fitted classifier over the Recommended_Career labels.
///
/// Implementations are immutable after load and shared across requests.
pub trait CareerModel: Send + Sync {
    /// One probability per career label, in catalog order, summing to ~1.0.
    fn predict_distribution(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError>;

    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    /// Backend name, surfaced on the health endpoint.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Artifact
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Logistic(LogisticRegression),
}

/// A loaded model plus the version string it was exported with.
pub struct LoadedModel {
    pub version: Option<String>,
    pub model: Box<dyn CareerModel>,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: Option<String>,
}

impl LoadedModel {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let VersionProbe { version } = serde_json::from_str(json)?;
        let model: Box<dyn CareerModel> = match serde_json::from_str::<ModelArtifact>(json)? {
            ModelArtifact::RandomForest(forest) => {
                forest.check()?;
                Box::new(forest)
            }
            ModelArtifact::Logistic(logistic) => {
                logistic.check()?;
                Box::new(logistic)
            }
        };
        Ok(Self { version, model })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

fn check_width(row: &FeatureRow, expected: usize) -> Result<(), ModelError> {
    if row.width() != expected {
        return Err(ModelError::RowWidth {
            expected,
            got: row.width(),
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Random forest
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// Nodes are stored flat; node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walks from the root to a leaf. Left when `x[feature] <= threshold`.
    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut i = 0;
        // Bounded by node count: a validated tree only points forward.
        for _ in 0..self.nodes.len() {
            match &self.nodes[i] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if x[*feature] <= *threshold { *left } else { *right },
                TreeNode::Leaf { value } => return value,
            }
        }
        &[]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn check(&self) -> Result<(), ModelError> {
        if self.n_classes == 0 {
            return Err(ModelError::Schema("n_classes must be positive".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Schema("forest has no trees".to_string()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Schema(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= self.n_features {
                            return Err(ModelError::Schema(format!(
                                "tree {t} node {n} splits on feature {feature}, model has {}",
                                self.n_features
                            )));
                        }
                        // Children must come after their parent, which rules out cycles.
                        if *left <= n || *right <= n || *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(ModelError::Schema(format!(
                                "tree {t} node {n} has out-of-order children ({left}, {right})"
                            )));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != self.n_classes {
                            return Err(ModelError::Schema(format!(
                                "tree {t} leaf {n} has {} class weights, expected {}",
                                value.len(),
                                self.n_classes
                            )));
                        }
                        if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                            return Err(ModelError::Schema(format!(
                                "tree {t} leaf {n} has a negative or non-finite weight"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl CareerModel for RandomForest {
    fn predict_distribution(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        check_width(row, self.n_features)?;
        let x = row.values();
        let mut proba = vec![0.0; self.n_classes];

        for tree in &self.trees {
            let leaf = tree.leaf(x);
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (p, w) in proba.iter_mut().zip(leaf) {
                    *p += w / total;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn backend(&self) -> &'static str {
        "random_forest"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Multinomial logistic regression
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub n_features: usize,
    pub n_classes: usize,
    /// `n_classes` rows of `n_features` weights.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    fn check(&self) -> Result<(), ModelError> {
        if self.n_classes == 0 {
            return Err(ModelError::Schema("n_classes must be positive".to_string()));
        }
        if self.coefficients.len() != self.n_classes || self.intercepts.len() != self.n_classes {
            return Err(ModelError::Schema(format!(
                "expected {} coefficient rows and intercepts, got {} and {}",
                self.n_classes,
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        if let Some(c) = self.coefficients.iter().position(|r| r.len() != self.n_features) {
            return Err(ModelError::Schema(format!(
                "coefficient row {c} does not have {} weights",
                self.n_features
            )));
        }
        Ok(())
    }
}

impl CareerModel for LogisticRegression {
    fn predict_distribution(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        check_width(row, self.n_features)?;
        let x = row.values();
        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + w.iter().zip(x).map(|(w, x)| w * x).sum::<f64>())
            .collect();

        // Shift by the max score so exp() cannot overflow.
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|e| e / total).collect())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn backend(&self) -> &'static str {
        "logistic"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
