//! File-based logging with per-component log files.
//!
//! Components write to separate log files with daily rotation:
//!
//! | Log File          | Component                    | Target Prefixes        |
//! |-------------------|------------------------------|------------------------|
//! | featgate.log      | Root logger (all components) | (all)                  |
//! | feature.log       | Feature lock service         | featgate_core          |
//! | persistence.log   | Persistence gateway          | featgate_persistence   |
//!
//! Log files are stored in `~/featgate/logs` by default.
//! Override with `FEATGATE_LOG_DIR` or the `featgate.logs.path` config key.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Internal definition for a component log file.
struct ComponentLogDef {
    /// Log file name (e.g. "feature.log")
    file_name: &'static str,
    /// Target module prefixes routed to this file
    targets: &'static [&'static str],
}

const ROOT_LOG_FILE: &str = "featgate.log";

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "feature.log",
        targets: &["featgate_core"],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["featgate_persistence", "sea_orm", "sqlx"],
    },
];

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    /// Never rotate (single file)
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Logging configuration for the entire application.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log directory (default: `~/featgate/logs`)
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    std::env::var("FEATGATE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(format!("{}/featgate/logs", home))
        })
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Create from application configuration.
    pub fn from_config(
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: String,
    ) -> Self {
        let log_dir = log_dir.map(PathBuf::from).unwrap_or_else(default_log_dir);
        let level = level.parse().unwrap_or(Level::INFO);

        Self {
            log_dir,
            console_output,
            console_level: level,
            file_logging,
            file_level: level,
            rotation: LogRotation::Daily,
        }
    }
}

/// Guard that keeps the logging system alive.
///
/// Holds the file appender worker guards; dropping it flushes buffered output.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Initialize the logging system with console output and per-component files.
///
/// `RUST_LOG` overrides the configured level for the console and root file.
/// Component files use per-layer [`Targets`] filters to route events by
/// their tracing target (module path).
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (layers, guards) = build_layers(config)?;

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            component_files = COMPONENT_LOGS.len(),
            "File logging initialized: {} (root) + {} component log files",
            ROOT_LOG_FILE,
            COMPONENT_LOGS.len()
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn build_layers(config: &LoggingConfig) -> std::io::Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let root_appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, ROOT_LOG_FILE);
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        let root_layer = fmt::layer()
            .with_writer(root_nb)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(root_filter);
        layers.push(Box::new(root_layer));

        for component in COMPONENT_LOGS {
            let appender = RollingFileAppender::new(
                config.rotation.into(),
                &config.log_dir,
                component.file_name,
            );
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let level: LevelFilter = config.file_level.into();
            let mut targets = Targets::new();
            for target in component.targets {
                targets = targets.with_target(*target, level);
            }

            let layer = fmt::layer()
                .with_writer(nb)
                .with_target(true)
                .with_thread_names(true)
                .with_ansi(false)
                .with_filter(targets);
            layers.push(Box::new(layer));
        }
    }

    Ok((layers, guards))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_parses_level() {
        let config = LoggingConfig::from_config(
            Some("/var/log/featgate".to_string()),
            false,
            true,
            "warn".to_string(),
        );
        assert_eq!(config.log_dir, PathBuf::from("/var/log/featgate"));
        assert_eq!(config.console_level, Level::WARN);
        assert_eq!(config.file_level, Level::WARN);
        assert!(!config.console_output);
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_from_config_bad_level_defaults_to_info() {
        let config = LoggingConfig::from_config(None, true, false, "loud".to_string());
        assert_eq!(config.console_level, Level::INFO);
    }

    #[test]
    fn test_build_layers_creates_log_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let log_dir = tmp.path().join("nested").join("logs");
        let config = LoggingConfig {
            log_dir: log_dir.clone(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::DEBUG,
            rotation: LogRotation::Never,
        };

        let (layers, guards) = build_layers(&config).unwrap();
        assert!(log_dir.is_dir());
        assert_eq!(layers.len(), 2 + COMPONENT_LOGS.len());
        assert_eq!(guards.len(), 1 + COMPONENT_LOGS.len());
    }

    #[test]
    fn test_build_layers_console_only() {
        let config = LoggingConfig {
            file_logging: false,
            ..LoggingConfig::default()
        };
        let (layers, guards) = build_layers(&config).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guards.is_empty());
    }
}
