use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::payload::Payload;

// A portfolio's current position in one asset. Keyed by (portfolio_id, asset_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub portfolio_id: i32,
    pub asset_id: i32,
    pub quantity: BigDecimal,
    pub cost_basis: BigDecimal,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHolding {
    pub portfolio_id: i32,
    pub asset_id: i32,
    pub quantity: BigDecimal,
    pub cost_basis: BigDecimal,
}

impl NewHolding {
    pub fn from_payload(payload: &Payload) -> Result<Self, AppError> {
        let mut fields = payload.fields();
        let portfolio_id = fields.required_id("portfolio_id");
        let asset_id = fields.required_id("asset_id");
        let quantity = fields.required_decimal("quantity");
        let cost_basis = fields.required_decimal("cost_basis");
        fields.finish()?;

        Ok(Self { portfolio_id, asset_id, quantity, cost_basis })
    }
}

#[derive(Debug, Deserialize)]
pub struct HoldingQuery {
    pub portfolio_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HoldingSummary {
    pub asset_id: i32,
    pub quantity: String,
    pub cost_basis: String,
}

impl From<Holding> for HoldingSummary {
    fn from(value: Holding) -> Self {
        Self {
            asset_id: value.asset_id,
            quantity: value.quantity.to_string(),
            cost_basis: value.cost_basis.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HoldingCreated {
    pub portfolio_id: i32,
    pub asset_id: i32,
}

impl From<Holding> for HoldingCreated {
    fn from(value: Holding) -> Self {
        Self {
            portfolio_id: value.portfolio_id,
            asset_id: value.asset_id,
        }
    }
}
