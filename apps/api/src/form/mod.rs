// Server-rendered form shell.
// GET / shows the profile form; POST /recommend runs the pipeline and renders
// the result page. Both share the pipeline with the JSON API.

pub mod handlers;
pub mod views;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::{UserProfile, DEFAULT_AGE, MAX_AGE, MIN_AGE};

/// Raw urlencoded form fields. Skills and interests arrive as repeated keys.
/// Age stays a string so a malformed value becomes a validation message
/// instead of a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl FormInput {
    /// Age as submitted, falling back to the default for a blank field.
    pub fn parsed_age(&self) -> Result<u32, AppError> {
        let raw = self.age.trim();
        if raw.is_empty() {
            return Ok(DEFAULT_AGE);
        }
        raw.parse::<u32>().map_err(|_| {
            AppError::Validation(format!(
                "Age must be a whole number between {MIN_AGE} and {MAX_AGE}"
            ))
        })
    }

    pub fn to_profile(&self) -> Result<UserProfile, AppError> {
        Ok(UserProfile {
            name: self.name.clone(),
            age: self.parsed_age()?,
            education: self.education.clone(),
            skills: self.skills.clone(),
            interests: self.interests.clone(),
        })
    }
}
