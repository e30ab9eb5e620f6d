//! In-memory persistence backend
//!
//! Keeps feature rows in a concurrent map; nothing survives a restart.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use featgate_common::{FeatureKey, FeatureMgtError, Result};
use tracing::debug;

use crate::model::{Feature, StorageMode};
use crate::traits::{FeaturePersistence, PersistenceService};

/// Process-local persistence keyed by the composite feature key
///
/// Each operation holds the entry's shard lock for its duration, so the
/// conditional expiry is as indivisible as the SQL backend's single UPDATE.
#[derive(Default)]
pub struct MemoryPersistService {
    features: DashMap<FeatureKey, Feature>,
}

impl MemoryPersistService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[async_trait]
impl PersistenceService for MemoryPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Memory
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl FeaturePersistence for MemoryPersistService {
    async fn feature_insert(&self, feature: &Feature) -> Result<()> {
        match self.features.entry(feature.key()) {
            Entry::Occupied(entry) => Err(FeatureMgtError::already_exists(entry.key())),
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "Feature entry inserted");
                entry.insert(feature.clone());
                Ok(())
            }
        }
    }

    async fn feature_find(&self, key: &FeatureKey) -> Result<Option<Feature>> {
        Ok(self.features.get(key).map(|entry| entry.value().clone()))
    }

    async fn feature_update(&self, feature: &Feature) -> Result<bool> {
        match self.features.get_mut(&feature.key()) {
            Some(mut entry) => {
                *entry = feature.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn feature_expire(&self, key: &FeatureKey, now_millis: i64) -> Result<bool> {
        match self.features.get_mut(key) {
            Some(mut entry) if entry.is_expired_at(now_millis) => {
                entry.unlock();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn feature_delete(&self, key: &FeatureKey) -> Result<bool> {
        Ok(self.features.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked(key: &FeatureKey, unlock_time: i64) -> Feature {
        let mut feature = Feature::new(key);
        feature.locked = true;
        feature.unlock_time = unlock_time;
        feature.lock_reason_codes = vec!["FAILED_ATTEMPTS".to_string()];
        feature.lock_reasons = vec!["Too many failed attempts".to_string()];
        feature
    }

    #[tokio::test]
    async fn test_insert_find_delete() {
        let svc = MemoryPersistService::new();
        let key = FeatureKey::new(1, "u1", "login");

        svc.feature_insert(&Feature::new(&key)).await.unwrap();
        assert_eq!(svc.len(), 1);
        assert_eq!(
            svc.feature_find(&key).await.unwrap(),
            Some(Feature::new(&key))
        );

        assert!(svc.feature_delete(&key).await.unwrap());
        assert!(!svc.feature_delete(&key).await.unwrap());
        assert!(svc.is_empty());
    }

    #[tokio::test]
    async fn test_insert_duplicate_keeps_existing_row() {
        let svc = MemoryPersistService::new();
        let key = FeatureKey::new(1, "u1", "login");
        svc.feature_insert(&locked(&key, 0)).await.unwrap();

        let err = svc.feature_insert(&Feature::new(&key)).await.unwrap_err();
        assert!(matches!(err, FeatureMgtError::AlreadyExists { .. }));
        assert!(svc.feature_find(&key).await.unwrap().unwrap().locked);
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let svc = MemoryPersistService::new();
        let key = FeatureKey::new(1, "u1", "login");
        assert!(!svc.feature_update(&Feature::new(&key)).await.unwrap());
        assert!(svc.is_empty());
    }

    #[tokio::test]
    async fn test_expire_only_past_deadline() {
        let svc = MemoryPersistService::new();
        let key = FeatureKey::new(7, "u1", "login");
        svc.feature_insert(&locked(&key, 1_000)).await.unwrap();

        assert!(!svc.feature_expire(&key, 1_000).await.unwrap());
        assert!(svc.feature_expire(&key, 1_001).await.unwrap());
        assert_eq!(
            svc.feature_find(&key).await.unwrap(),
            Some(Feature::new(&key))
        );
        assert!(!svc.feature_expire(&key, 1_002).await.unwrap());

        let absent = FeatureKey::new(7, "u2", "login");
        assert!(!svc.feature_expire(&absent, 1_002).await.unwrap());
    }
}
