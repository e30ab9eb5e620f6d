//! Service-level view types

use serde::{Deserialize, Serialize};

use featgate_persistence::Feature;

/// Why a feature is locked: codes and their positionally aligned messages
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockReasons {
    pub codes: Vec<String>,
    pub reasons: Vec<String>,
}

impl LockReasons {
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(code, reason)` pairs in lock order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes
            .iter()
            .map(String::as_str)
            .zip(self.reasons.iter().map(String::as_str))
    }
}

impl From<Feature> for LockReasons {
    fn from(feature: Feature) -> Self {
        Self {
            codes: feature.lock_reason_codes,
            reasons: feature.lock_reasons,
        }
    }
}
