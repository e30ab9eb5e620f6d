//! Feature lock service
//!
//! Lock state is reconciled against the clock on every read: a timed lock
//! whose deadline has passed is released in the store by a single conditional
//! update and reported as unlocked. There is no background sweep.

use std::sync::Arc;
use std::time::Duration;

use featgate_common::{
    FeatureKey, FeatureMgtError, NO_UNLOCK_TIME, Result, UNLOCK_TIME_DEFAULT_VALUE,
};
use featgate_persistence::{Feature, FeaturePersistence};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::model::LockReasons;
use crate::reason::ReasonCatalog;

pub struct FeatureLockService {
    persistence: Arc<dyn FeaturePersistence>,
    clock: Arc<dyn Clock>,
    reasons: ReasonCatalog,
    default_lock_duration: Duration,
}

impl FeatureLockService {
    pub fn new(persistence: Arc<dyn FeaturePersistence>) -> Self {
        Self {
            persistence,
            clock: Arc::new(SystemClock),
            reasons: ReasonCatalog::default(),
            default_lock_duration: Duration::from_millis(UNLOCK_TIME_DEFAULT_VALUE),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_reason_catalog(mut self, reasons: ReasonCatalog) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn with_default_lock_duration(mut self, duration: Duration) -> Self {
        self.default_lock_duration = duration;
        self
    }

    pub fn default_lock_duration(&self) -> Duration {
        self.default_lock_duration
    }

    /// Create an unlocked feature with no timer or reasons.
    ///
    /// Fails with `AlreadyExists` if the key is taken; the existing row is left as is.
    pub async fn add_feature(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<Feature> {
        let key = FeatureKey::parse(tenant_id, subject_id, feature_type)?;
        let feature = Feature::new(&key);
        self.persistence.feature_insert(&feature).await?;

        info!(tenant_id, subject_id, feature_type, "Feature added");
        Ok(feature)
    }

    /// Current state of the feature after lazy expiry
    pub async fn get_feature(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<Feature> {
        let key = FeatureKey::parse(tenant_id, subject_id, feature_type)?;
        self.load_reconciled(&key).await
    }

    pub async fn is_locked(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<bool> {
        Ok(self
            .get_feature(tenant_id, subject_id, feature_type)
            .await?
            .locked)
    }

    /// Reason codes and messages of the current lock; empty when unlocked
    pub async fn get_lock_reasons(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<LockReasons> {
        Ok(self
            .get_feature(tenant_id, subject_id, feature_type)
            .await?
            .into())
    }

    /// Lock the feature, replacing any previous lock, timer and reasons.
    ///
    /// `duration` of `None` locks indefinitely; otherwise the lock lapses once
    /// `duration` has elapsed. Reasons are derived from `reason_codes` through
    /// the reason catalog.
    pub async fn lock_feature<I, S>(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
        duration: Option<Duration>,
        reason_codes: I,
    ) -> Result<Feature>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = FeatureKey::parse(tenant_id, subject_id, feature_type)?;
        let resolved = self.reasons.resolve(reason_codes)?;
        let unlock_time = match duration {
            None => NO_UNLOCK_TIME,
            Some(duration) => self.deadline_after(duration)?,
        };

        let mut feature = Feature::new(&key);
        feature.locked = true;
        feature.unlock_time = unlock_time;
        feature.lock_reason_codes = resolved.codes;
        feature.lock_reasons = resolved.reasons;

        if !self.persistence.feature_update(&feature).await? {
            return Err(FeatureMgtError::not_found(&key));
        }

        info!(
            tenant_id,
            subject_id,
            feature_type,
            unlock_time,
            reason_codes = ?feature.lock_reason_codes,
            "Feature locked"
        );
        Ok(feature)
    }

    /// Lock for the configured default duration
    pub async fn lock_feature_for_default_duration<I, S>(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
        reason_codes: I,
    ) -> Result<Feature>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lock_feature(
            tenant_id,
            subject_id,
            feature_type,
            Some(self.default_lock_duration),
            reason_codes,
        )
        .await
    }

    /// Unlock the feature, clearing its timer and reasons. Idempotent.
    pub async fn unlock_feature(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<Feature> {
        let key = FeatureKey::parse(tenant_id, subject_id, feature_type)?;
        let feature = Feature::new(&key);

        if !self.persistence.feature_update(&feature).await? {
            return Err(FeatureMgtError::not_found(&key));
        }

        info!(tenant_id, subject_id, feature_type, "Feature unlocked");
        Ok(feature)
    }

    /// Delete the feature; deleting an absent feature is not an error
    pub async fn delete_feature(
        &self,
        tenant_id: i32,
        subject_id: &str,
        feature_type: &str,
    ) -> Result<()> {
        let key = FeatureKey::parse(tenant_id, subject_id, feature_type)?;
        let removed = self.persistence.feature_delete(&key).await?;

        debug!(tenant_id, subject_id, feature_type, removed, "Feature deleted");
        Ok(())
    }

    fn deadline_after(&self, duration: Duration) -> Result<i64> {
        if duration.as_millis() == 0 {
            return Err(FeatureMgtError::IllegalArgument(
                "lock duration must be at least one millisecond".to_string(),
            ));
        }
        i64::try_from(duration.as_millis())
            .ok()
            .and_then(|millis| self.clock.now_millis().checked_add(millis))
            .ok_or_else(|| {
                FeatureMgtError::IllegalArgument(format!(
                    "lock duration {:?} is out of range",
                    duration
                ))
            })
    }

    async fn load_reconciled(&self, key: &FeatureKey) -> Result<Feature> {
        let feature = self
            .persistence
            .feature_find(key)
            .await?
            .ok_or_else(|| FeatureMgtError::not_found(key))?;

        let now = self.clock.now_millis();
        if !feature.is_expired_at(now) {
            return Ok(feature);
        }

        if self.persistence.feature_expire(key, now).await? {
            debug!(
                key = %key,
                unlock_time = feature.unlock_time,
                now,
                "Feature lock expired, released"
            );
            return Ok(feature.into_unlocked());
        }

        // A concurrent lock, unlock or delete won; report what is stored now
        self.persistence
            .feature_find(key)
            .await?
            .ok_or_else(|| FeatureMgtError::not_found(key))
    }
}
