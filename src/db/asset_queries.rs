use sqlx::PgPool;
use crate::models::{Asset, NewAsset};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "SELECT id, type_id, name, symbol, metadata, created_at, updated_at
         FROM assets
         ORDER BY id"
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: NewAsset) -> Result<Asset, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "INSERT INTO assets (type_id, name, symbol, metadata)
         VALUES ($1, $2, $3, $4)
         RETURNING id, type_id, name, symbol, metadata, created_at, updated_at"
    )
    .bind(input.type_id)
    .bind(input.name)
    .bind(input.symbol)
    .bind(input.metadata)
    .fetch_one(pool)
    .await
}
