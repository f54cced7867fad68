mod user;
mod asset_type;
mod asset;
mod portfolio;
mod holding;
mod transaction;

pub use user::{User, NewUser};
pub use asset_type::{AssetType, NewAssetType, AssetTypeSummary, AssetTypeCreated};
pub use asset::{Asset, NewAsset, AssetSummary, AssetCreated};
pub use portfolio::{Portfolio, NewPortfolio, PortfolioSummary, PortfolioCreated};
pub use holding::{Holding, NewHolding, HoldingQuery, HoldingSummary, HoldingCreated};
pub use transaction::{
    Transaction, NewTransaction, TransactionType, TransactionSummary, TransactionCreated,
    RECENT_TRANSACTIONS_LIMIT,
};
