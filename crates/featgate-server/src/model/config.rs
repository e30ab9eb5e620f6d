//! Configuration management for the Featgate server
//!
//! This module handles loading and accessing application configuration.

use std::collections::HashMap;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use featgate_common::UNLOCK_TIME_DEFAULT_VALUE;
use featgate_core::ReasonCatalog;
use featgate_persistence::StorageMode;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Deserialize;

use super::constants::*;
use crate::startup::LoggingConfig;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "featgate", about = "Feature lock service host")]
pub struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(short = 's', long = "storage")]
    storage: Option<String>,
    #[arg(long = "init-schema")]
    init_schema: bool,
}

/// One configured lock reason: machine code and its readable message
#[derive(Clone, Debug, Deserialize)]
struct ReasonEntry {
    code: String,
    message: String,
}

/// Application configuration loaded from config files, environment and CLI
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process command line
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Cli::parse())
    }

    pub fn load(args: Cli) -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder()
            .add_source(File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DB_URL, v)?;
        }
        if let Some(v) = args.storage {
            config_builder = config_builder.set_override(STORAGE_MODE, v)?;
        }
        if args.init_schema {
            config_builder = config_builder.set_override(SCHEMA_INIT, true)?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    // ========================================================================
    // Storage Configuration
    // ========================================================================

    pub fn storage_mode(&self) -> Result<StorageMode, ConfigError> {
        match self.config.get_string(STORAGE_MODE) {
            Ok(v) => v.parse().map_err(ConfigError::Message),
            Err(ConfigError::NotFound(_)) => Ok(StorageMode::ExternalDb),
            Err(e) => Err(e),
        }
    }

    pub fn init_schema(&self) -> bool {
        self.config.get_bool(SCHEMA_INIT).unwrap_or(false)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self.get_u32_or(DB_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS);
        let min_connections = self.get_u32_or(DB_MIN_CONNECTIONS, DEFAULT_MIN_CONNECTIONS);
        let connect_timeout = self.get_u64_or(DB_CONNECT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT_SECS);
        let acquire_timeout = self.get_u64_or(DB_ACQUIRE_TIMEOUT, DEFAULT_ACQUIRE_TIMEOUT_SECS);
        let idle_timeout = self.get_u64_or(DB_IDLE_TIMEOUT, DEFAULT_IDLE_TIMEOUT_SECS);
        let max_lifetime = self.get_u64_or(DB_MAX_LIFETIME, DEFAULT_MAX_LIFETIME_SECS);
        let sqlx_logging = self.config.get_bool(DB_SQLX_LOGGING).unwrap_or(false);

        let url = self.config.get_string(DB_URL)?;

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection: DatabaseConnection = Database::connect(opt).await?;

        Ok(database_connection)
    }

    /// Non-negative integer setting; missing or out-of-range values use `default`
    fn get_u32_or(&self, key: &str, default: u32) -> u32 {
        self.config
            .get_int(key)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn get_u64_or(&self, key: &str, default: u64) -> u64 {
        self.config
            .get_int(key)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(default)
    }

    // ========================================================================
    // Feature Lock Configuration
    // ========================================================================

    pub fn default_lock_duration(&self) -> Duration {
        let millis = self
            .config
            .get_int(LOCK_DEFAULT_DURATION_MS)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(UNLOCK_TIME_DEFAULT_VALUE);
        Duration::from_millis(millis)
    }

    pub fn reason_catalog(&self) -> Result<ReasonCatalog, ConfigError> {
        let entries: Vec<ReasonEntry> = match self.config.get(LOCK_REASONS) {
            Ok(entries) => entries,
            Err(ConfigError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        let messages: HashMap<String, String> = entries
            .into_iter()
            .map(|entry| (entry.code, entry.message))
            .collect();
        Ok(ReasonCatalog::from_map(messages))
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGS_PATH).ok(),
            self.config.get_bool(LOGS_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGS_FILE).unwrap_or(true),
            self.config
                .get_string(LOGS_LEVEL)
                .unwrap_or("info".to_string()),
        )
    }
}
