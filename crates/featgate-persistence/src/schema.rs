//! Schema bootstrap for the feature mapping table

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::entity::feature_mapping;

/// Create `idn_feature_mapping` from the entity definition when it is missing
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut stmt = schema.create_table_from_entity(feature_mapping::Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;

    info!(backend = ?backend, "Feature mapping schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database, EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_ensure_schema_is_repeatable() {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();

        ensure_schema(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();

        let count = feature_mapping::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 0);
    }
}
