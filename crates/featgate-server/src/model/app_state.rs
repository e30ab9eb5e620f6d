//! Application state management
//!
//! This module defines the state the host builds at startup and hands to
//! in-process consumers of the feature lock service.

use std::sync::Arc;

use featgate_core::FeatureLockService;
use featgate_persistence::{
    ExternalDbPersistService, FeaturePersistence, MemoryPersistService, PersistenceService,
    StorageMode, schema::ensure_schema,
};
use tracing::info;

use super::config::Configuration;

/// Application state shared with feature lock consumers
#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    /// Storage backend selected by `featgate.storage.mode`
    pub persistence: Arc<dyn PersistenceService>,
    pub feature_lock_service: Arc<FeatureLockService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("persistence", &self.persistence.storage_mode())
            .field("feature_lock_service", &"<FeatureLockService>")
            .finish()
    }
}

fn share<P>(backend: P) -> (Arc<dyn PersistenceService>, Arc<dyn FeaturePersistence>)
where
    P: PersistenceService + 'static,
{
    let backend = Arc::new(backend);
    (backend.clone(), backend)
}

impl AppState {
    /// Connect the configured backend and construct the feature lock service.
    pub async fn build(configuration: Configuration) -> anyhow::Result<Self> {
        let storage_mode = configuration.storage_mode()?;
        info!("Persistence mode: {}", storage_mode);

        let (persistence, gateway) = match storage_mode {
            StorageMode::ExternalDb => {
                let db = configuration.database_connection().await?;
                if configuration.init_schema() {
                    ensure_schema(&db).await?;
                    info!("Feature mapping schema ensured");
                }
                share(ExternalDbPersistService::new(db))
            }
            StorageMode::Memory => share(MemoryPersistService::new()),
        };

        persistence.health_check().await?;

        let reasons = configuration.reason_catalog()?;
        let default_lock_duration = configuration.default_lock_duration();
        info!(
            reason_codes = reasons.len(),
            default_lock_duration_ms = default_lock_duration.as_millis() as u64,
            "Feature lock service configured"
        );

        let feature_lock_service = FeatureLockService::new(gateway)
            .with_reason_catalog(reasons)
            .with_default_lock_duration(default_lock_duration);

        Ok(Self {
            configuration,
            persistence,
            feature_lock_service: Arc::new(feature_lock_service),
        })
    }
}
