use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::db::{
    asset_queries, asset_type_queries, holding_queries, portfolio_queries, schema,
    transaction_queries, user_queries, Store, StoreError,
};
use crate::models::{
    Asset, AssetType, Holding, NewAsset, NewAssetType, NewHolding, NewPortfolio,
    NewTransaction, NewUser, Portfolio, Transaction, User,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("🐘 Connected to Postgres (max {} connections)", max_connections);
        schema::create_all(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, input: NewUser) -> Result<User, StoreError> {
        Ok(user_queries::create(&self.pool, input).await?)
    }

    async fn delete_user(&self, id: i32) -> Result<u64, StoreError> {
        Ok(user_queries::delete(&self.pool, id).await?)
    }

    async fn list_asset_types(&self) -> Result<Vec<AssetType>, StoreError> {
        Ok(asset_type_queries::fetch_all(&self.pool).await?)
    }

    async fn create_asset_type(&self, input: NewAssetType) -> Result<AssetType, StoreError> {
        Ok(asset_type_queries::create(&self.pool, input).await?)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(asset_queries::fetch_all(&self.pool).await?)
    }

    async fn create_asset(&self, input: NewAsset) -> Result<Asset, StoreError> {
        Ok(asset_queries::create(&self.pool, input).await?)
    }

    async fn list_portfolios(&self) -> Result<Vec<Portfolio>, StoreError> {
        Ok(portfolio_queries::fetch_all(&self.pool).await?)
    }

    async fn create_portfolio(&self, input: NewPortfolio) -> Result<Portfolio, StoreError> {
        Ok(portfolio_queries::create(&self.pool, input).await?)
    }

    async fn delete_portfolio(&self, id: i32) -> Result<u64, StoreError> {
        Ok(portfolio_queries::delete(&self.pool, id).await?)
    }

    async fn list_holdings(&self, portfolio_id: i32) -> Result<Vec<Holding>, StoreError> {
        Ok(holding_queries::fetch_by_portfolio(&self.pool, portfolio_id).await?)
    }

    async fn create_holding(&self, input: NewHolding) -> Result<Holding, StoreError> {
        Ok(holding_queries::create(&self.pool, input).await?)
    }

    async fn list_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>, StoreError> {
        Ok(transaction_queries::fetch_recent(&self.pool, limit).await?)
    }

    async fn create_transaction(&self, input: NewTransaction) -> Result<Transaction, StoreError> {
        Ok(transaction_queries::create(&self.pool, input).await?)
    }
}
