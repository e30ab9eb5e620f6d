//! Composite key identifying a feature row

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::MAX_KEY_PART_LENGTH;
use crate::error::{FeatureMgtError, Result};

/// `(tenant, subject, feature type)` tuple; no two feature rows share one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureKey {
    pub tenant_id: i32,
    pub subject_id: String,
    pub feature_type: String,
}

impl FeatureKey {
    pub fn new(tenant_id: i32, subject_id: impl Into<String>, feature_type: impl Into<String>) -> Self {
        Self {
            tenant_id,
            subject_id: subject_id.into(),
            feature_type: feature_type.into(),
        }
    }

    /// Build a key and reject blank or oversized parts
    pub fn parse(tenant_id: i32, subject_id: &str, feature_type: &str) -> Result<Self> {
        let key = Self::new(tenant_id, subject_id, feature_type);
        key.validate()?;
        Ok(key)
    }

    pub fn validate(&self) -> Result<()> {
        check_part("subject id", &self.subject_id)?;
        check_part("feature type", &self.feature_type)
    }
}

fn check_part(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FeatureMgtError::IllegalArgument(format!(
            "{} must not be blank",
            name
        )));
    }
    if value.chars().count() > MAX_KEY_PART_LENGTH {
        return Err(FeatureMgtError::IllegalArgument(format!(
            "{} exceeds {} characters",
            name, MAX_KEY_PART_LENGTH
        )));
    }
    Ok(())
}

impl Display for FeatureKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tenant ID: {}, subject ID: {}, feature type: {}",
            self.tenant_id, self.subject_id, self.feature_type
        )
    }
}
