use sqlx::PgPool;
use tracing::info;

/// Idempotent DDL for the six tables. Executed in order on every connect.
pub const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(128) NOT NULL,
        name VARCHAR(120),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS asset_types (
        id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL UNIQUE,
        description TEXT,
        schema_hint JSONB
    )",
    "CREATE TABLE IF NOT EXISTS assets (
        id SERIAL PRIMARY KEY,
        type_id INTEGER NOT NULL REFERENCES asset_types(id),
        name VARCHAR(255) NOT NULL,
        symbol VARCHAR(20),
        metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS portfolios (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name VARCHAR(100) NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS holdings (
        portfolio_id INTEGER NOT NULL REFERENCES portfolios(id) ON DELETE CASCADE,
        asset_id INTEGER NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
        quantity NUMERIC(18, 8) NOT NULL,
        cost_basis NUMERIC(14, 2) NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (portfolio_id, asset_id)
    )",
    "DO $$ BEGIN
        CREATE TYPE transaction_type AS ENUM
            ('buy', 'sell', 'dividend', 'split', 'transfer_in', 'transfer_out', 'fee');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$",
    r#"CREATE TABLE IF NOT EXISTS transactions (
        id BIGSERIAL PRIMARY KEY,
        portfolio_id INTEGER NOT NULL REFERENCES portfolios(id) ON DELETE CASCADE,
        asset_id INTEGER NOT NULL REFERENCES assets(id),
        "type" transaction_type NOT NULL,
        quantity NUMERIC(18, 8) NOT NULL,
        price_per_unit NUMERIC(14, 6),
        total_amount NUMERIC(14, 2),
        fees NUMERIC(10, 2) NOT NULL DEFAULT 0,
        executed_at TIMESTAMPTZ NOT NULL,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_executed_at ON transactions (executed_at DESC)",
];

pub async fn create_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(*statement).execute(pool).await?;
    }
    info!("Schema ready ({} statements applied)", STATEMENTS.len());
    Ok(())
}
