use sqlx::PgPool;
use crate::models::{NewPortfolio, Portfolio};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "SELECT id, user_id, name, description, created_at
         FROM portfolios
         ORDER BY id"
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: NewPortfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "INSERT INTO portfolios (user_id, name, description)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, name, description, created_at"
    )
    .bind(input.user_id)
    .bind(input.name)
    .bind(input.description)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
