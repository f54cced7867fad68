use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::payload::Payload;

// Represents a logical grouping of investments (e.g., "Long-term", "Retirement", "Speculative").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>
}

#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl NewPortfolio {
    pub fn from_payload(payload: &Payload) -> Result<Self, AppError> {
        let mut fields = payload.fields();
        let user_id = fields.required_id("user_id");
        let name = fields.required_text("name");
        let description = fields.optional_text("description");
        fields.finish()?;

        Ok(Self { user_id, name, description })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
}

impl From<Portfolio> for PortfolioSummary {
    fn from(value: Portfolio) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortfolioCreated {
    pub id: i32,
    pub name: String,
}

impl From<Portfolio> for PortfolioCreated {
    fn from(value: Portfolio) -> Self {
        Self { id: value.id, name: value.name }
    }
}
