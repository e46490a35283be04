use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL_FILE: &str = "career_recommendation_model.json";
const DEFAULT_ENCODERS_FILE: &str = "career_encoders.json";
const DEFAULT_DATASET_FILE: &str = "AI-based Career Recommendation System.csv";

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment reads the artifacts
/// from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub artifact_dir: PathBuf,
    pub model_file: String,
    pub encoders_file: String,
    pub dataset_file: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            artifact_dir: PathBuf::from(env_or("ARTIFACT_DIR", ".")),
            model_file: env_or("MODEL_FILE", DEFAULT_MODEL_FILE),
            encoders_file: env_or("ENCODERS_FILE", DEFAULT_ENCODERS_FILE),
            dataset_file: env_or("DATASET_FILE", DEFAULT_DATASET_FILE),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    pub fn encoders_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.encoders_file)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.dataset_file)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
