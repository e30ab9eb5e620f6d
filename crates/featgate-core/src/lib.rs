//! Featgate Core - Feature lock service
//!
//! This crate provides:
//! - `FeatureLockService`: lock/unlock transitions with lazy time-based expiry
//! - Clock abstraction for wall-clock and simulated time
//! - Reason catalog mapping lock reason codes to readable messages

pub mod clock;
pub mod model;
pub mod reason;
pub mod service;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use featgate_common::{ErrorCode, FeatureKey, FeatureMgtError, Result};
pub use featgate_persistence::Feature;
pub use model::LockReasons;
pub use reason::ReasonCatalog;
pub use service::FeatureLockService;
