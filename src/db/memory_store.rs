use std::collections::BTreeMap;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use parking_lot::Mutex;

use crate::db::{Store, StoreError};
use crate::models::{
    Asset, AssetType, Holding, NewAsset, NewAssetType, NewHolding, NewPortfolio,
    NewTransaction, NewUser, Portfolio, Transaction, User,
};

/// (precision, scale) of each NUMERIC column, matching the Postgres schema.
const QUANTITY: (usize, usize) = (18, 8);
const COST_BASIS: (usize, usize) = (14, 2);
const PRICE_PER_UNIT: (usize, usize) = (14, 6);
const TOTAL_AMOUNT: (usize, usize) = (14, 2);
const FEES: (usize, usize) = (10, 2);

/// VARCHAR lengths, matching the Postgres schema.
const USER_EMAIL: usize = 255;
const USER_PASSWORD_HASH: usize = 128;
const USER_NAME: usize = 120;
const ASSET_TYPE_NAME: usize = 50;
const ASSET_NAME: usize = 255;
const ASSET_SYMBOL: usize = 20;
const PORTFOLIO_NAME: usize = 100;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    asset_types: BTreeMap<i32, AssetType>,
    assets: BTreeMap<i32, Asset>,
    portfolios: BTreeMap<i32, Portfolio>,
    holdings: BTreeMap<(i32, i32), Holding>,
    transactions: BTreeMap<i64, Transaction>,
    user_seq: i32,
    asset_type_seq: i32,
    asset_seq: i32,
    portfolio_seq: i32,
    transaction_seq: i64,
}

/// Ephemeral store for test mode.
///
/// Enforces the same unique, foreign-key, length and numeric-precision constraints as
/// the Postgres schema, and cascades deletes the same way. One mutex guards all
/// tables, so every operation is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn remove_portfolio(&mut self, id: i32) -> u64 {
        if self.portfolios.remove(&id).is_none() {
            return 0;
        }
        self.holdings.retain(|(portfolio_id, _), _| *portfolio_id != id);
        self.transactions.retain(|_, t| t.portfolio_id != id);
        1
    }
}

fn foreign_key(table: &'static str, column: &str, id: i64) -> StoreError {
    StoreError::ForeignKeyViolation {
        table,
        detail: format!("{}={} is not present", column, id),
    }
}

/// Coerces a decimal into a NUMERIC(precision, scale) column. Extra fractional
/// digits are rounded half away from zero; too many integer digits is an
/// overflow.
///
/// The digit count and exponent are checked before any rescaling, so a value
/// like `1e1000000` never gets expanded.
fn fit_numeric(
    value: BigDecimal,
    (precision, scale): (usize, usize),
    column: &'static str,
) -> Result<BigDecimal, StoreError> {
    let (int_val, exponent) = value.as_bigint_and_exponent();
    let digits = int_val.to_string();
    let digits = digits.trim_start_matches('-');
    let integer_limit = (precision - scale) as i64;
    let scale = scale as i64;
    if digits == "0" {
        return Ok(if exponent > scale { BigDecimal::from(0) } else { value });
    }
    let digit_count = digits.len() as i64;

    if digit_count - exponent > integer_limit {
        return Err(StoreError::NumericOverflow { column });
    }
    // Below half a unit in the last place.
    if exponent - digit_count > scale {
        return Ok(BigDecimal::from(0));
    }

    let value = if exponent > scale {
        round_half_away_from_zero(value, scale)
    } else {
        value
    };

    // Rounding can carry into one more integer digit.
    let text = value.with_scale(0).to_string();
    let integer_digits = text.trim_start_matches('-').trim_start_matches('0').len();
    if integer_digits as i64 > integer_limit {
        return Err(StoreError::NumericOverflow { column });
    }
    Ok(value)
}

fn round_half_away_from_zero(value: BigDecimal, scale: i64) -> BigDecimal {
    let half_unit = BigDecimal::new(5_i32.into(), scale + 1);
    let nudged = if value < BigDecimal::from(0) {
        value - half_unit
    } else {
        value + half_unit
    };
    nudged.with_scale(scale)
}

/// VARCHAR(max) counts characters, not bytes.
fn fit_text(value: &str, max: usize, column: &'static str) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::ValueTooLong { column, max });
    }
    Ok(())
}

fn fit_optional_text(value: Option<&str>, max: usize, column: &'static str) -> Result<(), StoreError> {
    value.map_or(Ok(()), |v| fit_text(v, max, column))
}

fn fit_optional(
    value: Option<BigDecimal>,
    shape: (usize, usize),
    column: &'static str,
) -> Result<Option<BigDecimal>, StoreError> {
    value.map(|v| fit_numeric(v, shape, column)).transpose()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, StoreError> {
        fit_text(&input.email, USER_EMAIL, "users.email")?;
        fit_text(&input.password_hash, USER_PASSWORD_HASH, "users.password_hash")?;
        fit_optional_text(input.name.as_deref(), USER_NAME, "users.name")?;
        let mut tables = self.tables.lock();
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation {
                table: "users",
                detail: format!("email '{}' already exists", input.email),
            });
        }
        tables.user_seq += 1;
        let user = User {
            id: tables.user_seq,
            email: input.email,
            password_hash: input.password_hash,
            name: input.name,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock();
        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }
        let owned: Vec<i32> = tables
            .portfolios
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for portfolio_id in owned {
            tables.remove_portfolio(portfolio_id);
        }
        Ok(1)
    }

    async fn list_asset_types(&self) -> Result<Vec<AssetType>, StoreError> {
        Ok(self.tables.lock().asset_types.values().cloned().collect())
    }

    async fn create_asset_type(&self, input: NewAssetType) -> Result<AssetType, StoreError> {
        fit_text(&input.name, ASSET_TYPE_NAME, "asset_types.name")?;
        let mut tables = self.tables.lock();
        if tables.asset_types.values().any(|t| t.name == input.name) {
            return Err(StoreError::UniqueViolation {
                table: "asset_types",
                detail: format!("name '{}' already exists", input.name),
            });
        }
        tables.asset_type_seq += 1;
        let asset_type = AssetType {
            id: tables.asset_type_seq,
            name: input.name,
            description: input.description,
            schema_hint: input.schema_hint,
        };
        tables.asset_types.insert(asset_type.id, asset_type.clone());
        Ok(asset_type)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(self.tables.lock().assets.values().cloned().collect())
    }

    async fn create_asset(&self, input: NewAsset) -> Result<Asset, StoreError> {
        fit_text(&input.name, ASSET_NAME, "assets.name")?;
        fit_optional_text(input.symbol.as_deref(), ASSET_SYMBOL, "assets.symbol")?;
        let mut tables = self.tables.lock();
        if !tables.asset_types.contains_key(&input.type_id) {
            return Err(foreign_key("assets", "type_id", input.type_id.into()));
        }
        tables.asset_seq += 1;
        let now = Utc::now();
        let asset = Asset {
            id: tables.asset_seq,
            type_id: input.type_id,
            name: input.name,
            symbol: input.symbol,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        };
        tables.assets.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn list_portfolios(&self) -> Result<Vec<Portfolio>, StoreError> {
        Ok(self.tables.lock().portfolios.values().cloned().collect())
    }

    async fn create_portfolio(&self, input: NewPortfolio) -> Result<Portfolio, StoreError> {
        fit_text(&input.name, PORTFOLIO_NAME, "portfolios.name")?;
        let mut tables = self.tables.lock();
        if !tables.users.contains_key(&input.user_id) {
            return Err(foreign_key("portfolios", "user_id", input.user_id.into()));
        }
        tables.portfolio_seq += 1;
        let portfolio = Portfolio {
            id: tables.portfolio_seq,
            user_id: input.user_id,
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };
        tables.portfolios.insert(portfolio.id, portfolio.clone());
        Ok(portfolio)
    }

    async fn delete_portfolio(&self, id: i32) -> Result<u64, StoreError> {
        Ok(self.tables.lock().remove_portfolio(id))
    }

    async fn list_holdings(&self, portfolio_id: i32) -> Result<Vec<Holding>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .holdings
            .range((portfolio_id, i32::MIN)..=(portfolio_id, i32::MAX))
            .map(|(_, h)| h.clone())
            .collect())
    }

    async fn create_holding(&self, input: NewHolding) -> Result<Holding, StoreError> {
        let mut tables = self.tables.lock();
        let key = (input.portfolio_id, input.asset_id);
        if tables.holdings.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "holdings",
                detail: format!(
                    "(portfolio_id, asset_id)=({}, {}) already exists",
                    input.portfolio_id, input.asset_id
                ),
            });
        }
        if !tables.portfolios.contains_key(&input.portfolio_id) {
            return Err(foreign_key("holdings", "portfolio_id", input.portfolio_id.into()));
        }
        if !tables.assets.contains_key(&input.asset_id) {
            return Err(foreign_key("holdings", "asset_id", input.asset_id.into()));
        }
        let holding = Holding {
            portfolio_id: input.portfolio_id,
            asset_id: input.asset_id,
            quantity: fit_numeric(input.quantity, QUANTITY, "quantity")?,
            cost_basis: fit_numeric(input.cost_basis, COST_BASIS, "cost_basis")?,
            updated_at: Utc::now(),
        };
        tables.holdings.insert(key, holding.clone());
        Ok(holding)
    }

    async fn list_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>, StoreError> {
        let tables = self.tables.lock();
        let mut transactions: Vec<Transaction> = tables.transactions.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.executed_at
                .cmp(&a.executed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        transactions.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(transactions)
    }

    async fn create_transaction(&self, input: NewTransaction) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.lock();
        if !tables.portfolios.contains_key(&input.portfolio_id) {
            return Err(foreign_key("transactions", "portfolio_id", input.portfolio_id.into()));
        }
        if !tables.assets.contains_key(&input.asset_id) {
            return Err(foreign_key("transactions", "asset_id", input.asset_id.into()));
        }
        let quantity = fit_numeric(input.quantity, QUANTITY, "quantity")?;
        let price_per_unit = fit_optional(input.price_per_unit, PRICE_PER_UNIT, "price_per_unit")?;
        let total_amount = fit_optional(input.total_amount, TOTAL_AMOUNT, "total_amount")?;
        let fees = fit_numeric(input.fees, FEES, "fees")?;

        tables.transaction_seq += 1;
        let transaction = Transaction {
            id: tables.transaction_seq,
            portfolio_id: input.portfolio_id,
            asset_id: input.asset_id,
            kind: input.kind,
            quantity,
            price_per_unit,
            total_amount,
            fees,
            executed_at: input.executed_at,
            notes: input.notes,
            created_at: Utc::now(),
        };
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use crate::models::TransactionType;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    async fn seeded() -> (MemoryStore, User, Portfolio, Asset) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "test@example.com".into(),
                password_hash: "x".repeat(60),
                name: None,
            })
            .await
            .unwrap();
        let asset_type = store
            .create_asset_type(NewAssetType {
                name: "stock".into(),
                description: Some("Public equities".into()),
                schema_hint: None,
            })
            .await
            .unwrap();
        let asset = store
            .create_asset(NewAsset {
                type_id: asset_type.id,
                name: "Apple".into(),
                symbol: Some("AAPL".into()),
                metadata: json!({}),
            })
            .await
            .unwrap();
        let portfolio = store
            .create_portfolio(NewPortfolio {
                user_id: user.id,
                name: "Test".into(),
                description: None,
            })
            .await
            .unwrap();
        (store, user, portfolio, asset)
    }

    fn holding(portfolio_id: i32, asset_id: i32) -> NewHolding {
        NewHolding {
            portfolio_id,
            asset_id,
            quantity: dec("10"),
            cost_basis: dec("7000"),
        }
    }

    fn transaction(portfolio_id: i32, asset_id: i32, executed_at: chrono::DateTime<Utc>) -> NewTransaction {
        NewTransaction {
            portfolio_id,
            asset_id,
            kind: TransactionType::Buy,
            quantity: dec("1"),
            price_per_unit: Some(dec("150.25")),
            total_amount: None,
            fees: dec("0"),
            executed_at,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one() {
        let (_, user, portfolio, asset) = seeded().await;
        assert_eq!(user.id, 1);
        assert_eq!(portfolio.id, 1);
        assert_eq!(asset.id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (store, _, _, _) = seeded().await;
        let err = store
            .create_user(NewUser {
                email: "test@example.com".into(),
                password_hash: "y".into(),
                name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { table: "users", .. }));
    }

    #[tokio::test]
    async fn test_duplicate_asset_type_name_is_rejected() {
        let (store, _, _, _) = seeded().await;
        let err = store
            .create_asset_type(NewAssetType { name: "stock".into(), description: None, schema_hint: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { table: "asset_types", .. }));
        assert_eq!(store.list_asset_types().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_asset_requires_existing_type() {
        let store = MemoryStore::new();
        let err = store
            .create_asset(NewAsset { type_id: 42, name: "Ghost".into(), symbol: None, metadata: json!({}) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { table: "assets", .. }));
        assert!(store.list_assets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_portfolio_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store
            .create_portfolio(NewPortfolio { user_id: 9, name: "Orphan".into(), description: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { table: "portfolios", .. }));
    }

    #[tokio::test]
    async fn test_holding_composite_key_is_unique() {
        let (store, _, portfolio, asset) = seeded().await;
        store.create_holding(holding(portfolio.id, asset.id)).await.unwrap();
        let err = store.create_holding(holding(portfolio.id, asset.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { table: "holdings", .. }));
        assert_eq!(store.list_holdings(portfolio.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_holding_keeps_given_decimal_text() {
        let (store, _, portfolio, asset) = seeded().await;
        let created = store.create_holding(holding(portfolio.id, asset.id)).await.unwrap();
        assert_eq!(created.quantity.to_string(), "10");
        assert_eq!(created.cost_basis.to_string(), "7000");
    }

    #[tokio::test]
    async fn test_holdings_are_filtered_by_portfolio() {
        let (store, user, portfolio, asset) = seeded().await;
        let other = store
            .create_portfolio(NewPortfolio { user_id: user.id, name: "Other".into(), description: None })
            .await
            .unwrap();
        store.create_holding(holding(portfolio.id, asset.id)).await.unwrap();
        store.create_holding(holding(other.id, asset.id)).await.unwrap();

        let listed = store.list_holdings(other.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].portfolio_id, other.id);
    }

    #[test]
    fn test_fit_numeric_rounds_scale_and_rejects_overflow() {
        let fitted = fit_numeric(dec("0.123456789"), QUANTITY, "quantity").unwrap();
        assert_eq!(fitted.to_string(), "0.12345679");
        let fitted = fit_numeric(dec("1.999"), COST_BASIS, "cost_basis").unwrap();
        assert_eq!(fitted.to_string(), "2.00");
        let fitted = fit_numeric(dec("1.994"), COST_BASIS, "cost_basis").unwrap();
        assert_eq!(fitted.to_string(), "1.99");
        let fitted = fit_numeric(dec("-1.995"), COST_BASIS, "cost_basis").unwrap();
        assert_eq!(fitted.to_string(), "-2.00");

        assert!(fit_numeric(dec("9999999999.5"), QUANTITY, "quantity").is_ok());
        let err = fit_numeric(dec("12345678901"), QUANTITY, "quantity").unwrap_err();
        assert!(matches!(err, StoreError::NumericOverflow { column: "quantity" }));

        assert!(fit_numeric(dec("-123456789012"), COST_BASIS, "cost_basis").is_ok());
        assert!(fit_numeric(dec("1234567890123"), COST_BASIS, "cost_basis").is_err());
        // Rounds up into a thirteenth integer digit.
        assert!(fit_numeric(dec("999999999999.995"), COST_BASIS, "cost_basis").is_err());
    }

    #[test]
    fn test_fit_numeric_handles_extreme_exponents() {
        let err = fit_numeric(dec("1e1000000"), QUANTITY, "quantity").unwrap_err();
        assert!(matches!(err, StoreError::NumericOverflow { column: "quantity" }));

        let fitted = fit_numeric(dec("1e-3000000"), QUANTITY, "quantity").unwrap();
        assert_eq!(fitted, BigDecimal::from(0));
        let fitted = fit_numeric(dec("-4e-9"), QUANTITY, "quantity").unwrap();
        assert_eq!(fitted, BigDecimal::from(0));
        let fitted = fit_numeric(dec("5e-9"), QUANTITY, "quantity").unwrap();
        assert_eq!(fitted.to_string(), "0.00000001");
    }

    #[tokio::test]
    async fn test_text_longer_than_column_is_rejected() {
        let (store, user, _, _) = seeded().await;

        let err = store
            .create_asset_type(NewAssetType { name: "x".repeat(51), description: None, schema_hint: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValueTooLong { column: "asset_types.name", max: 50 }));

        let err = store
            .create_asset(NewAsset {
                type_id: 1,
                name: "Long Symbol Corp".into(),
                symbol: Some("S".repeat(21)),
                metadata: json!({}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValueTooLong { column: "assets.symbol", .. }));

        let err = store
            .create_portfolio(NewPortfolio { user_id: user.id, name: "p".repeat(101), description: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValueTooLong { column: "portfolios.name", .. }));

        let err = store
            .create_user(NewUser { email: "long@example.com".into(), password_hash: "h".repeat(129), name: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ValueTooLong { column: "users.password_hash", .. }));

        assert_eq!(store.list_asset_types().await.unwrap().len(), 1);
        assert_eq!(store.list_assets().await.unwrap().len(), 1);
        assert_eq!(store.list_portfolios().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_text_length_counts_characters() {
        let store = MemoryStore::new();
        let name = "é".repeat(50);
        let created = store
            .create_asset_type(NewAssetType { name: name.clone(), description: None, schema_hint: None })
            .await
            .unwrap();
        assert_eq!(created.name, name);
    }

    #[tokio::test]
    async fn test_recent_transactions_are_newest_first_and_limited() {
        let (store, _, portfolio, asset) = seeded().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for day in 0..5 {
            store
                .create_transaction(transaction(portfolio.id, asset.id, base + Duration::days(day)))
                .await
                .unwrap();
        }

        let recent = store.list_recent_transactions(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].executed_at, base + Duration::days(4));
        assert!(recent.windows(2).all(|w| w[0].executed_at >= w[1].executed_at));
    }

    #[tokio::test]
    async fn test_transaction_requires_existing_asset() {
        let (store, _, portfolio, _) = seeded().await;
        let err = store
            .create_transaction(transaction(portfolio.id, 99, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { table: "transactions", .. }));
    }

    #[tokio::test]
    async fn test_deleting_portfolio_cascades() {
        let (store, _, portfolio, asset) = seeded().await;
        store.create_holding(holding(portfolio.id, asset.id)).await.unwrap();
        store.create_transaction(transaction(portfolio.id, asset.id, Utc::now())).await.unwrap();

        assert_eq!(store.delete_portfolio(portfolio.id).await.unwrap(), 1);
        assert!(store.list_holdings(portfolio.id).await.unwrap().is_empty());
        assert!(store.list_recent_transactions(100).await.unwrap().is_empty());
        assert_eq!(store.list_assets().await.unwrap().len(), 1);
        assert_eq!(store.delete_portfolio(portfolio.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_through_portfolios() {
        let (store, user, portfolio, asset) = seeded().await;
        store.create_holding(holding(portfolio.id, asset.id)).await.unwrap();

        assert_eq!(store.delete_user(user.id).await.unwrap(), 1);
        assert!(store.list_portfolios().await.unwrap().is_empty());
        assert!(store.list_holdings(portfolio.id).await.unwrap().is_empty());
    }
}
