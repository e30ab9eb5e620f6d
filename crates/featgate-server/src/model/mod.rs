//! Server models: configuration, constants and shared application state

pub mod app_state;
pub mod config;
pub mod constants;

pub use app_state::AppState;
pub use config::Configuration;
