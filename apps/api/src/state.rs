use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::CareerDistribution;
use crate::recommendation::catalog::CategoryCatalog;
use crate::recommendation::model::{CareerModel, LoadedModel};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is loaded once before the listener binds and is read-only
/// afterwards, so concurrent requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CategoryCatalog>,
    /// Backend chosen by the model artifact's `kind`.
    pub model: Arc<dyn CareerModel>,
    pub model_version: Option<String>,
    /// Training-data summary; `None` when no dataset file was found.
    pub dataset: Option<Arc<CareerDistribution>>,
}

impl AppState {
    /// Loads the catalog, model and optional dataset named by `config`.
    ///
    /// Any artifact problem is returned as an error; the caller is expected to
    /// abort startup.
    pub fn load(config: &Config) -> Result<Self> {
        let encoders_path = config.encoders_path();
        let catalog = CategoryCatalog::load(&encoders_path)
            .with_context(|| format!("loading catalog from {}", encoders_path.display()))?;
        info!(
            "Catalog loaded: {} education levels, {} skills, {} interests, {} careers",
            catalog.education.len(),
            catalog.skills.len(),
            catalog.interests.len(),
            catalog.careers.len()
        );

        let model_path = config.model_path();
        let loaded = LoadedModel::load(&model_path)
            .with_context(|| format!("loading model from {}", model_path.display()))?;
        verify_pair(&catalog, &loaded)?;
        info!(
            "Model loaded (backend: {}, version: {})",
            loaded.model.backend(),
            loaded.version.as_deref().unwrap_or("unversioned")
        );

        let dataset_path = config.dataset_path();
        let dataset = if dataset_path.exists() {
            let dist = CareerDistribution::load(&dataset_path)
                .with_context(|| format!("loading dataset from {}", dataset_path.display()))?;
            info!("Dataset loaded: {} rows", dist.total_rows);
            Some(Arc::new(dist))
        } else {
            warn!(
                "Dataset {} not found; insights are disabled",
                dataset_path.display()
            );
            None
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            model: Arc::from(loaded.model),
            model_version: loaded.version,
            dataset,
        })
    }
}

/// Checks that the model was trained against this catalog.
///
/// Shapes must match exactly. Versions must match when both artifacts carry
/// one; a missing version is trusted with a warning.
pub fn verify_pair(catalog: &CategoryCatalog, loaded: &LoadedModel) -> Result<()> {
    let model = &loaded.model;
    if model.n_features() != catalog.feature_width() {
        bail!(
            "model expects {} features but the catalog encodes {} (2 + {} skills + {} interests)",
            model.n_features(),
            catalog.feature_width(),
            catalog.skills.len(),
            catalog.interests.len()
        );
    }
    if model.n_classes() != catalog.careers.len() {
        bail!(
            "model predicts {} classes but the catalog lists {} careers",
            model.n_classes(),
            catalog.careers.len()
        );
    }
    match (&catalog.version, &loaded.version) {
        (Some(c), Some(m)) if c != m => {
            bail!("catalog version '{c}' does not match model version '{m}'")
        }
        (Some(_), Some(_)) => {}
        _ => warn!("Catalog or model artifact is unversioned; assuming they were exported together"),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use super::*;
    use crate::recommendation::catalog::tests::{sample_catalog, SAMPLE_CATALOG_JSON};

    /// Logistic model over the sample catalog's 9 features and 4 careers.
    /// Python/SQL/Data profiles land on "Data Scientist".
    pub(crate) const SAMPLE_MODEL_JSON: &str = r#"{
        "kind": "logistic",
        "version": "2025.1",
        "n_features": 9,
        "n_classes": 4,
        "coefficients": [
            [0, 0, 0, 1, 1, 1, 2, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 2, 0],
            [0, 0, 2, 0, 1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 1, 0, 0, 2]
        ],
        "intercepts": [0, 0, 0, 0]
    }"#;

    pub(crate) fn test_state() -> AppState {
        let loaded = LoadedModel::from_json(SAMPLE_MODEL_JSON).unwrap();
        AppState {
            catalog: Arc::new(sample_catalog()),
            model: Arc::from(loaded.model),
            model_version: loaded.version,
            dataset: None,
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            artifact_dir: dir.to_path_buf(),
            model_file: "model.json".to_string(),
            encoders_file: "encoders.json".to_string(),
            dataset_file: "dataset.csv".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_matching_pair_passes() {
        let loaded = LoadedModel::from_json(SAMPLE_MODEL_JSON).unwrap();
        assert!(verify_pair(&sample_catalog(), &loaded).is_ok());
    }

    #[test]
    fn test_version_mismatch_fails() {
        let json = SAMPLE_MODEL_JSON.replace("2025.1", "2024.9");
        let loaded = LoadedModel::from_json(&json).unwrap();
        let err = verify_pair(&sample_catalog(), &loaded).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_unversioned_model_is_trusted() {
        let json = SAMPLE_MODEL_JSON.replace(r#""version": "2025.1","#, "");
        let loaded = LoadedModel::from_json(&json).unwrap();
        assert!(loaded.version.is_none());
        assert!(verify_pair(&sample_catalog(), &loaded).is_ok());
    }

    #[test]
    fn test_feature_width_mismatch_fails() {
        let json = r#"{"kind": "logistic", "n_features": 3, "n_classes": 4,
            "coefficients": [[0,0,0],[0,0,0],[0,0,0],[0,0,0]], "intercepts": [0,0,0,0]}"#;
        let loaded = LoadedModel::from_json(json).unwrap();
        let err = verify_pair(&sample_catalog(), &loaded).unwrap_err();
        assert!(err.to_string().contains("features"));
    }

    #[test]
    fn test_class_count_mismatch_fails() {
        let json = r#"{"kind": "random_forest", "n_features": 9, "n_classes": 2,
            "trees": [{"nodes": [{"value": [1.0, 1.0]}]}]}"#;
        let loaded = LoadedModel::from_json(json).unwrap();
        let err = verify_pair(&sample_catalog(), &loaded).unwrap_err();
        assert!(err.to_string().contains("classes"));
    }

    #[test]
    fn test_load_from_directory_without_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "encoders.json", SAMPLE_CATALOG_JSON);
        write(dir.path(), "model.json", SAMPLE_MODEL_JSON);

        let state = AppState::load(&config_for(dir.path())).unwrap();
        assert_eq!(state.catalog.careers.len(), 4);
        assert_eq!(state.model.backend(), "logistic");
        assert!(state.dataset.is_none());
    }

    #[test]
    fn test_load_reads_dataset_when_present() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "encoders.json", SAMPLE_CATALOG_JSON);
        write(dir.path(), "model.json", SAMPLE_MODEL_JSON);
        write(
            dir.path(),
            "dataset.csv",
            "Age,Recommended_Career\n22,Data Scientist\n31,Software Engineer\n",
        );

        let state = AppState::load(&config_for(dir.path())).unwrap();
        assert_eq!(state.dataset.unwrap().total_rows, 2);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "encoders.json", SAMPLE_CATALOG_JSON);
        let err = AppState::load(&config_for(dir.path())).err().unwrap();
        assert!(format!("{err:#}").contains("loading model"));
    }

    #[test]
    fn test_corrupt_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "encoders.json", "{not json");
        write(dir.path(), "model.json", SAMPLE_MODEL_JSON);
        let err = AppState::load(&config_for(dir.path())).err().unwrap();
        assert!(format!("{err:#}").contains("loading catalog"));
    }
}
