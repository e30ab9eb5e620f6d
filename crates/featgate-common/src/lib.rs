//! Featgate Common - Shared types and error codes
//!
//! This crate provides the foundational types used across all Featgate components:
//! - The composite feature key
//! - Error types and error codes
//! - Key validation helpers

pub mod error;
pub mod key;

// Re-exports for convenience
pub use error::{ErrorCode, FeatureMgtError, Result};
pub use key::FeatureKey;

/// Maximum length accepted for subject ids and feature types
pub const MAX_KEY_PART_LENGTH: usize = 255;

/// Default lock duration in milliseconds, used when the caller does not supply one
pub const UNLOCK_TIME_DEFAULT_VALUE: u64 = 300_000;

/// Unlock time value meaning "no timer"
pub const NO_UNLOCK_TIME: i64 = 0;
