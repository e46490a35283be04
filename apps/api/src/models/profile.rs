use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 60;
pub const DEFAULT_AGE: u32 = 22;

/// User-facing warning shown when a submission is incomplete.
pub const INCOMPLETE_PROFILE_WARNING: &str =
    "Please fill in all details to get your recommendation.";

/// One form submission. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub education: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl UserProfile {
    /// Checks the fields the pipeline cannot run without. Catalog membership is
    /// checked later by the encoder.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.skills.is_empty() || self.interests.is_empty() {
            return Err(AppError::Validation(INCOMPLETE_PROFILE_WARNING.to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(AppError::Validation(format!(
                "Age must be between {MIN_AGE} and {MAX_AGE}, got {}",
                self.age
            )));
        }
        Ok(())
    }

    /// Trimmed, title-cased display name.
    pub fn clean_name(&self) -> String {
        title_case(self.name.trim())
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so "ann lee" becomes "Ann Lee" and "o'NEIL" becomes "O'Neil".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
