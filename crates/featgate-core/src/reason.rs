//! Lock reason catalog
//!
//! Maps machine reason codes (e.g. `FAILED_ATTEMPTS`) to the human-readable
//! text stored alongside them. Codes without an entry describe themselves.

use std::collections::HashMap;

use featgate_common::{FeatureMgtError, MAX_KEY_PART_LENGTH, Result};

use crate::model::LockReasons;

#[derive(Clone, Debug, Default)]
pub struct ReasonCatalog {
    messages: HashMap<String, String>,
}

impl ReasonCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn with_reason(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(code.into(), message.into());
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn describe(&self, code: &str) -> String {
        self.messages
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// Validate codes and derive their messages.
    ///
    /// Codes are trimmed; blank or oversized codes are rejected and repeats
    /// are dropped, keeping the first occurrence.
    pub fn resolve<I, S>(&self, codes: I) -> Result<LockReasons>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = LockReasons::default();
        for code in codes {
            let code = code.as_ref().trim();
            if code.is_empty() {
                return Err(FeatureMgtError::IllegalArgument(
                    "lock reason code must not be blank".to_string(),
                ));
            }
            if code.chars().count() > MAX_KEY_PART_LENGTH {
                return Err(FeatureMgtError::IllegalArgument(format!(
                    "lock reason code exceeds {} characters",
                    MAX_KEY_PART_LENGTH
                )));
            }
            if resolved.codes.iter().any(|c| c == code) {
                continue;
            }
            resolved.reasons.push(self.describe(code));
            resolved.codes.push(code.to_string());
        }
        Ok(resolved)
    }
}
