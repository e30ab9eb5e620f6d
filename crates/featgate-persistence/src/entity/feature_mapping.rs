//! Feature mapping entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "idn_feature_mapping")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: i32,
    #[sea_orm(
        primary_key,
        auto_increment = false,
        column_type = "String(StringLen::N(255))"
    )]
    pub subject_id: String,
    #[sea_orm(
        primary_key,
        auto_increment = false,
        column_type = "String(StringLen::N(255))"
    )]
    pub feature_type: String,
    pub is_feature_locked: bool,
    pub feature_unlock_time: i64,
    /// JSON array of human-readable reasons
    #[sea_orm(column_type = "Text", nullable)]
    pub feature_lock_reason: Option<String>,
    /// JSON array of reason codes, positionally aligned with `feature_lock_reason`
    #[sea_orm(column_type = "Text", nullable)]
    pub feature_lock_reason_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
