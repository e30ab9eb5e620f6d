//! SQL-based persistence backend (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! Implements the feature gateway against the `idn_feature_mapping` table.
//! All statements are parameterized and filtered by the full composite key.

use async_trait::async_trait;
use featgate_common::error::{
    DECODE_FEATURE, DELETE_FEATURE, ENCODE_FEATURE, EXPIRE_FEATURE, INSERT_FEATURE,
    SELECT_FEATURE_BY_ID, UPDATE_FEATURE,
};
use featgate_common::{FeatureKey, FeatureMgtError, NO_UNLOCK_TIME, Result};
use sea_orm::{prelude::Expr, *};
use tracing::debug;

use crate::codec::{EMPTY_REASONS, decode_reasons, encode_reasons};
use crate::entity::feature_mapping;
use crate::model::*;
use crate::traits::*;

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` handed in at construction time.
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn exists(&self, key: &FeatureKey) -> Result<bool> {
        let count = by_key(feature_mapping::Entity::find(), key)
            .count(&self.db)
            .await
            .map_err(|e| FeatureMgtError::server(SELECT_FEATURE_BY_ID, key, e))?;
        Ok(count > 0)
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[inline]
fn by_key<Q: QueryFilter>(query: Q, key: &FeatureKey) -> Q {
    query
        .filter(feature_mapping::Column::TenantId.eq(key.tenant_id))
        .filter(feature_mapping::Column::SubjectId.eq(key.subject_id.as_str()))
        .filter(feature_mapping::Column::FeatureType.eq(key.feature_type.as_str()))
}

fn model_to_feature(model: feature_mapping::Model) -> serde_json::Result<Feature> {
    Ok(Feature {
        lock_reasons: decode_reasons(model.feature_lock_reason.as_deref())?,
        lock_reason_codes: decode_reasons(model.feature_lock_reason_code.as_deref())?,
        tenant_id: model.tenant_id,
        subject_id: model.subject_id,
        feature_type: model.feature_type,
        locked: model.is_feature_locked,
        unlock_time: model.feature_unlock_time,
    })
}

fn feature_to_active(feature: &Feature) -> serde_json::Result<feature_mapping::ActiveModel> {
    Ok(feature_mapping::ActiveModel {
        tenant_id: Set(feature.tenant_id),
        subject_id: Set(feature.subject_id.clone()),
        feature_type: Set(feature.feature_type.clone()),
        is_feature_locked: Set(feature.locked),
        feature_unlock_time: Set(feature.unlock_time),
        feature_lock_reason: Set(Some(encode_reasons(&feature.lock_reasons)?)),
        feature_lock_reason_code: Set(Some(encode_reasons(&feature.lock_reason_codes)?)),
    })
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::ExternalDb
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}

// ============================================================================
// FeaturePersistence implementation
// ============================================================================

#[async_trait]
impl FeaturePersistence for ExternalDbPersistService {
    async fn feature_insert(&self, feature: &Feature) -> Result<()> {
        let key = feature.key();
        let entity = feature_to_active(feature)
            .map_err(|e| FeatureMgtError::server(ENCODE_FEATURE, &key, e))?;

        match feature_mapping::Entity::insert(entity)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => {
                debug!(
                    tenant_id = key.tenant_id,
                    subject_id = %key.subject_id,
                    feature_type = %key.feature_type,
                    "Feature row inserted"
                );
                Ok(())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(FeatureMgtError::already_exists(&key))
            }
            Err(e) => Err(FeatureMgtError::server(INSERT_FEATURE, &key, e)),
        }
    }

    async fn feature_find(&self, key: &FeatureKey) -> Result<Option<Feature>> {
        let model = by_key(feature_mapping::Entity::find(), key)
            .one(&self.db)
            .await
            .map_err(|e| FeatureMgtError::server(SELECT_FEATURE_BY_ID, key, e))?;

        model
            .map(model_to_feature)
            .transpose()
            .map_err(|e| FeatureMgtError::server(DECODE_FEATURE, key, e))
    }

    async fn feature_update(&self, feature: &Feature) -> Result<bool> {
        let key = feature.key();
        let reasons = encode_reasons(&feature.lock_reasons)
            .map_err(|e| FeatureMgtError::server(ENCODE_FEATURE, &key, e))?;
        let reason_codes = encode_reasons(&feature.lock_reason_codes)
            .map_err(|e| FeatureMgtError::server(ENCODE_FEATURE, &key, e))?;

        let result = by_key(feature_mapping::Entity::update_many(), &key)
            .col_expr(
                feature_mapping::Column::IsFeatureLocked,
                Expr::value(feature.locked),
            )
            .col_expr(
                feature_mapping::Column::FeatureUnlockTime,
                Expr::value(feature.unlock_time),
            )
            .col_expr(
                feature_mapping::Column::FeatureLockReason,
                Expr::value(reasons),
            )
            .col_expr(
                feature_mapping::Column::FeatureLockReasonCode,
                Expr::value(reason_codes),
            )
            .exec(&self.db)
            .await
            .map_err(|e| FeatureMgtError::server(UPDATE_FEATURE, &key, e))?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        // MySQL counts a row rewritten with identical values as unaffected
        self.exists(&key).await
    }

    async fn feature_expire(&self, key: &FeatureKey, now_millis: i64) -> Result<bool> {
        let result = by_key(feature_mapping::Entity::update_many(), key)
            .col_expr(feature_mapping::Column::IsFeatureLocked, Expr::value(false))
            .col_expr(
                feature_mapping::Column::FeatureUnlockTime,
                Expr::value(NO_UNLOCK_TIME),
            )
            .col_expr(
                feature_mapping::Column::FeatureLockReason,
                Expr::value(EMPTY_REASONS),
            )
            .col_expr(
                feature_mapping::Column::FeatureLockReasonCode,
                Expr::value(EMPTY_REASONS),
            )
            .filter(feature_mapping::Column::IsFeatureLocked.eq(true))
            .filter(feature_mapping::Column::FeatureUnlockTime.gt(NO_UNLOCK_TIME))
            .filter(feature_mapping::Column::FeatureUnlockTime.lt(now_millis))
            .exec(&self.db)
            .await
            .map_err(|e| FeatureMgtError::server(EXPIRE_FEATURE, key, e))?;

        Ok(result.rows_affected > 0)
    }

    async fn feature_delete(&self, key: &FeatureKey) -> Result<bool> {
        let result = by_key(feature_mapping::Entity::delete_many(), key)
            .exec(&self.db)
            .await
            .map_err(|e| FeatureMgtError::server(DELETE_FEATURE, key, e))?;

        Ok(result.rows_affected > 0)
    }
}
