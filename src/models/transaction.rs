use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::payload::Payload;

/// Most recent transactions returned by the list endpoint.
pub const RECENT_TRANSACTIONS_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Split,
    TransferIn,
    TransferOut,
    Fee,
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::Buy,
        TransactionType::Sell,
        TransactionType::Dividend,
        TransactionType::Split,
        TransactionType::TransferIn,
        TransactionType::TransferOut,
        TransactionType::Fee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Dividend => "dividend",
            TransactionType::Split => "split",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
            TransactionType::Fee => "fee",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown transaction type '{}'", s))
    }
}

// Represents an immutable event (trade, dividend, fee, ...) recorded against a portfolio's asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub portfolio_id: i32,
    pub asset_id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: BigDecimal,
    pub price_per_unit: Option<BigDecimal>,
    pub total_amount: Option<BigDecimal>,
    pub fees: BigDecimal,
    pub executed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub portfolio_id: i32,
    pub asset_id: i32,
    pub kind: TransactionType,
    pub quantity: BigDecimal,
    pub price_per_unit: Option<BigDecimal>,
    pub total_amount: Option<BigDecimal>,
    pub fees: BigDecimal,
    pub executed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn from_payload(payload: &Payload) -> Result<Self, AppError> {
        let mut fields = payload.fields();
        let asset_id = fields.required_id("asset_id");
        let portfolio_id = fields.required_id("portfolio_id");
        let quantity = fields.required_decimal("quantity");
        let kind = fields.required_transaction_type("type");
        let price_per_unit = fields.optional_decimal("price_per_unit");
        let total_amount = fields.optional_decimal("total_amount");
        let fees = fields.optional_decimal("fees").unwrap_or_else(|| BigDecimal::from(0));
        let executed_at = fields.optional_timestamp("executed_at").unwrap_or_else(Utc::now);
        let notes = fields.optional_text("notes");
        fields.finish()?;

        Ok(Self {
            portfolio_id,
            asset_id,
            kind,
            quantity,
            price_per_unit,
            total_amount,
            fees,
            executed_at,
            notes,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: i64,
    pub asset_id: i32,
    pub quantity: String,
    pub price_per_unit: Option<String>,
    pub executed_at: String,
}

impl From<Transaction> for TransactionSummary {
    fn from(value: Transaction) -> Self {
        Self {
            id: value.id,
            asset_id: value.asset_id,
            quantity: value.quantity.to_string(),
            price_per_unit: value.price_per_unit.map(|p| p.to_string()),
            executed_at: value.executed_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionCreated {
    pub id: i64,
}

impl From<Transaction> for TransactionCreated {
    fn from(value: Transaction) -> Self {
        Self { id: value.id }
    }
}
