use sqlx::PgPool;
use crate::models::{NewTransaction, Transaction};

pub async fn fetch_recent(pool: &PgPool, limit: i64) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        r#"SELECT id, portfolio_id, asset_id, "type", quantity, price_per_unit, total_amount,
                  fees, executed_at, notes, created_at
           FROM transactions
           ORDER BY executed_at DESC, id DESC
           LIMIT $1"#
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: NewTransaction) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        r#"INSERT INTO transactions
               (portfolio_id, asset_id, "type", quantity, price_per_unit, total_amount, fees, executed_at, notes)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
           RETURNING id, portfolio_id, asset_id, "type", quantity, price_per_unit, total_amount,
                     fees, executed_at, notes, created_at"#
    )
    .bind(input.portfolio_id)
    .bind(input.asset_id)
    .bind(input.kind)
    .bind(input.quantity)
    .bind(input.price_per_unit)
    .bind(input.total_amount)
    .bind(input.fees)
    .bind(input.executed_at)
    .bind(input.notes)
    .fetch_one(pool)
    .await
}
