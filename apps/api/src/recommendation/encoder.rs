//! Feature encoding: UserProfile → the fixed-width numeric row the model expects.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::models::profile::UserProfile;
use crate::recommendation::catalog::{Catalog, CategoryCatalog};

/// A submitted value that is not present in its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownCategory {
    pub field: &'static str,
    pub value: String,
}

/// `[age, education_index] ++ one_hot(skills) ++ one_hot(interests)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    values: Vec<f64>,
}

impl FeatureRow {
    #[cfg(test)]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Encodes a profile against the catalog shipped with the model.
///
/// Selection order is irrelevant: skills and interests are laid out in catalog
/// order. Every submitted value must exist in its catalog.
pub fn encode(profile: &UserProfile, catalog: &CategoryCatalog) -> Result<FeatureRow, UnknownCategory> {
    let education = catalog
        .education
        .index_of(&profile.education)
        .ok_or_else(|| UnknownCategory {
            field: catalog.education.field(),
            value: profile.education.clone(),
        })?;

    let mut values = Vec::with_capacity(catalog.feature_width());
    values.push(f64::from(profile.age));
    values.push(education as f64);
    values.extend(one_hot(&profile.skills, &catalog.skills)?);
    values.extend(one_hot(&profile.interests, &catalog.interests)?);

    Ok(FeatureRow { values })
}

fn one_hot(selected: &[String], catalog: &Catalog) -> Result<Vec<f64>, UnknownCategory> {
    if let Some(unknown) = selected.iter().find(|s| catalog.index_of(s).is_none()) {
        return Err(UnknownCategory {
            field: catalog.field(),
            value: unknown.clone(),
        });
    }
    let members: HashSet<&str> = selected.iter().map(String::as_str).collect();
    Ok(catalog
        .labels()
        .iter()
        .map(|label| if members.contains(label.as_str()) { 1.0 } else { 0.0 })
        .collect())
}
