//! Domain model types for the persistence gateway
//!
//! These types are returned by the persistence traits, decoupled from
//! specific storage backends.

use std::time::Duration;

use featgate_common::{FeatureKey, NO_UNLOCK_TIME};
use serde::{Deserialize, Serialize};

/// Lockable state of one feature for one subject within a tenant.
///
/// An unlocked feature always has `unlock_time == 0` and no reasons. A locked
/// feature with `unlock_time == 0` is locked indefinitely; otherwise it is
/// treated as expired once the clock passes `unlock_time` (epoch millis).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub tenant_id: i32,
    pub subject_id: String,
    pub feature_type: String,
    pub locked: bool,
    pub unlock_time: i64,
    pub lock_reason_codes: Vec<String>,
    pub lock_reasons: Vec<String>,
}

impl Feature {
    /// A fresh, unlocked feature for `key`
    pub fn new(key: &FeatureKey) -> Self {
        Self {
            tenant_id: key.tenant_id,
            subject_id: key.subject_id.clone(),
            feature_type: key.feature_type.clone(),
            locked: false,
            unlock_time: NO_UNLOCK_TIME,
            lock_reason_codes: Vec::new(),
            lock_reasons: Vec::new(),
        }
    }

    pub fn key(&self) -> FeatureKey {
        FeatureKey::new(
            self.tenant_id,
            self.subject_id.clone(),
            self.feature_type.clone(),
        )
    }

    /// Locked with no timer
    pub fn is_indefinite(&self) -> bool {
        self.locked && self.unlock_time == NO_UNLOCK_TIME
    }

    /// Locked, timed, and past its deadline at `now_millis`
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.locked && self.unlock_time > NO_UNLOCK_TIME && now_millis > self.unlock_time
    }

    /// Time left on a timed lock; `None` when unlocked, indefinite, or expired
    pub fn remaining_at(&self, now_millis: i64) -> Option<Duration> {
        if !self.locked || self.unlock_time == NO_UNLOCK_TIME || now_millis > self.unlock_time {
            return None;
        }
        let remaining = self.unlock_time.checked_sub(now_millis)?;
        u64::try_from(remaining).ok().map(Duration::from_millis)
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        self.unlock_time = NO_UNLOCK_TIME;
        self.lock_reason_codes.clear();
        self.lock_reasons.clear();
    }

    pub fn into_unlocked(mut self) -> Self {
        self.unlock();
        self
    }
}

/// Storage backend used by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// External database (MySQL/PostgreSQL/SQLite via SeaORM)
    ExternalDb,
    /// Process-local map, lost on restart
    Memory,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::ExternalDb => write!(f, "external_db"),
            StorageMode::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "external_db" | "external-db" | "db" | "mysql" | "postgresql" | "sqlite" => {
                Ok(StorageMode::ExternalDb)
            }
            "memory" | "mem" => Ok(StorageMode::Memory),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}
