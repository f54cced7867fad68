use sqlx::PgPool;
use crate::models::{AssetType, NewAssetType};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<AssetType>, sqlx::Error> {
    sqlx::query_as::<_, AssetType>(
        "SELECT id, name, description, schema_hint
         FROM asset_types
         ORDER BY id"
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: NewAssetType) -> Result<AssetType, sqlx::Error> {
    sqlx::query_as::<_, AssetType>(
        "INSERT INTO asset_types (name, description, schema_hint)
         VALUES ($1, $2, $3)
         RETURNING id, name, description, schema_hint"
    )
    .bind(input.name)
    .bind(input.description)
    .bind(input.schema_hint)
    .fetch_one(pool)
    .await
}
