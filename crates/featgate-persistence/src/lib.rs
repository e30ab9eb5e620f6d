//! Featgate Persistence - Database entities and persistence gateway
//!
//! This crate provides:
//! - SeaORM entity definition for the feature mapping table
//! - The `FeaturePersistence` gateway trait
//! - SQL (MySQL/PostgreSQL/SQLite) and in-memory backends
//! - Domain model types returned by the gateway

pub mod codec;
pub mod entity;
pub mod memory;
pub mod model;
pub mod schema;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export persistence traits
pub use traits::{FeaturePersistence, PersistenceService};

// Re-export backends
pub use memory::MemoryPersistService;
pub use sql::ExternalDbPersistService;

// Re-export model types
pub use model::{Feature, StorageMode};
