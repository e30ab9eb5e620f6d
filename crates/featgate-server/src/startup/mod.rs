//! Server startup: logging initialization and shutdown handling

mod logging;
mod shutdown;

pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::shutdown_signal;
