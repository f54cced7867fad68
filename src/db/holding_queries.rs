use sqlx::PgPool;
use crate::models::{Holding, NewHolding};

pub async fn fetch_by_portfolio(pool: &PgPool, portfolio_id: i32) -> Result<Vec<Holding>, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "SELECT portfolio_id, asset_id, quantity, cost_basis, updated_at
         FROM holdings
         WHERE portfolio_id = $1
         ORDER BY asset_id"
    )
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: NewHolding) -> Result<Holding, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "INSERT INTO holdings (portfolio_id, asset_id, quantity, cost_basis)
         VALUES ($1, $2, $3, $4)
         RETURNING portfolio_id, asset_id, quantity, cost_basis, updated_at"
    )
    .bind(input.portfolio_id)
    .bind(input.asset_id)
    .bind(input.quantity)
    .bind(input.cost_basis)
    .fetch_one(pool)
    .await
}
