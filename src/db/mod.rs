pub mod schema;
pub mod user_queries;
pub mod asset_type_queries;
pub mod asset_queries;
pub mod portfolio_queries;
pub mod holding_queries;
pub mod transaction_queries;
mod pg_store;
mod memory_store;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::{
    Asset, AssetType, Holding, NewAsset, NewAssetType, NewHolding, NewPortfolio,
    NewTransaction, NewUser, Portfolio, Transaction, User,
};

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate key in {table}: {detail}")]
    UniqueViolation { table: &'static str, detail: String },

    #[error("foreign key violation in {table}: {detail}")]
    ForeignKeyViolation { table: &'static str, detail: String },

    #[error("numeric field overflow in {column}")]
    NumericOverflow { column: &'static str },

    #[error("value too long for {column} (max {max} characters)")]
    ValueTooLong { column: &'static str, max: usize },
}

/// Storage operations behind the HTTP surface. Each call is one atomic unit of work.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, StoreError>;

    /// Cascades to the user's portfolios and everything they own.
    async fn delete_user(&self, id: i32) -> Result<u64, StoreError>;

    async fn list_asset_types(&self) -> Result<Vec<AssetType>, StoreError>;

    async fn create_asset_type(&self, input: NewAssetType) -> Result<AssetType, StoreError>;

    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError>;

    async fn create_asset(&self, input: NewAsset) -> Result<Asset, StoreError>;

    async fn list_portfolios(&self) -> Result<Vec<Portfolio>, StoreError>;

    async fn create_portfolio(&self, input: NewPortfolio) -> Result<Portfolio, StoreError>;

    /// Cascades to the portfolio's holdings and transactions.
    async fn delete_portfolio(&self, id: i32) -> Result<u64, StoreError>;

    async fn list_holdings(&self, portfolio_id: i32) -> Result<Vec<Holding>, StoreError>;

    async fn create_holding(&self, input: NewHolding) -> Result<Holding, StoreError>;

    /// Newest first by `executed_at`, ties broken by id.
    async fn list_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>, StoreError>;

    async fn create_transaction(&self, input: NewTransaction) -> Result<Transaction, StoreError>;
}

pub fn is_memory_url(database_url: &str) -> bool {
    matches!(database_url.trim(), "memory" | "memory://" | "memory:")
}

/// Opens the store a database URL points at: `memory://` for the ephemeral
/// in-process store, anything else is handed to Postgres.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Arc<dyn Store>, StoreError> {
    if is_memory_url(database_url) {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = PgStore::connect(database_url, max_connections).await?;
    Ok(Arc::new(store))
}
