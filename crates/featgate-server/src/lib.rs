//! Featgate server library
//!
//! Hosts the feature lock service: loads configuration, sets up logging,
//! connects the backing store and exposes the constructed service to
//! in-process consumers through `AppState`.

pub mod model;
pub mod startup;
