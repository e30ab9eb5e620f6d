//! Feature lock service implementations

pub mod feature;

pub use feature::FeatureLockService;
