//! Configuration keys and defaults

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const ENV_PREFIX: &str = "FEATGATE";

pub const DB_URL: &str = "db.url";
pub const DB_MAX_CONNECTIONS: &str = "db.pool.config.maximumPoolSize";
pub const DB_MIN_CONNECTIONS: &str = "db.pool.config.minimumPoolSize";
pub const DB_CONNECT_TIMEOUT: &str = "db.pool.config.connectionTimeout";
pub const DB_ACQUIRE_TIMEOUT: &str = "db.pool.config.initializationFailTimeout";
pub const DB_IDLE_TIMEOUT: &str = "db.pool.config.idleTimeout";
pub const DB_MAX_LIFETIME: &str = "db.pool.config.maxLifetime";
pub const DB_SQLX_LOGGING: &str = "db.pool.config.sqlxLogging";

pub const STORAGE_MODE: &str = "featgate.storage.mode";
pub const SCHEMA_INIT: &str = "featgate.schema.init";
pub const LOCK_DEFAULT_DURATION_MS: &str = "featgate.lock.default_duration_ms";
pub const LOCK_REASONS: &str = "featgate.lock.reasons";

pub const LOGS_PATH: &str = "featgate.logs.path";
pub const LOGS_CONSOLE: &str = "featgate.logs.console";
pub const LOGS_FILE: &str = "featgate.logs.file";
pub const LOGS_LEVEL: &str = "featgate.logs.level";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;
