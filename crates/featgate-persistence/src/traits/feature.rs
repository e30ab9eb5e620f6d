//! Feature persistence trait
//!
//! Defines the gateway operations for feature lock rows. Every operation is
//! scoped by the full `(tenant, subject, feature type)` key and applies no
//! business rules; store failures come back as `FeatureMgtError::ServerError`
//! carrying the operation's error code and key.

use async_trait::async_trait;
use featgate_common::{FeatureKey, Result};

use crate::model::Feature;

/// Feature lock storage operations
#[async_trait]
pub trait FeaturePersistence: Send + Sync {
    /// Insert a new row; `AlreadyExists` when the key is taken
    async fn feature_insert(&self, feature: &Feature) -> Result<()>;

    /// Load a row exactly as stored, `None` when absent
    async fn feature_find(&self, key: &FeatureKey) -> Result<Option<Feature>>;

    /// Replace the whole row addressed by `feature.key()`.
    ///
    /// Returns `false` when no row matches.
    async fn feature_update(&self, feature: &Feature) -> Result<bool>;

    /// Unlock the row only if it is still locked with a timer that ended
    /// before `now_millis`, as one indivisible store operation.
    ///
    /// Returns `true` when this call performed the unlock.
    async fn feature_expire(&self, key: &FeatureKey, now_millis: i64) -> Result<bool>;

    /// Delete the row; deleting an absent key is not an error.
    ///
    /// Returns whether a row was removed.
    async fn feature_delete(&self, key: &FeatureKey) -> Result<bool>;
}
