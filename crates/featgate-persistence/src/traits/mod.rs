//! Persistence traits for the storage abstraction layer
//!
//! This module defines the gateway traits that abstract over the storage
//! backends: external database (MySQL/PostgreSQL/SQLite) and in-memory.

pub mod feature;

pub use feature::FeaturePersistence;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Unified persistence service trait
///
/// Adds backend introspection on top of the feature gateway operations.
#[async_trait]
pub trait PersistenceService: FeaturePersistence + Send + Sync {
    /// Get the current storage mode
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
