use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::payload::Payload;

// A tradable instrument. `metadata` holds type-specific attributes whose shape
// is described by the owning asset type's schema hint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: i32,
    pub type_id: i32,
    pub name: String,
    pub symbol: Option<String>,
    pub metadata: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAsset {
    pub type_id: i32,
    pub name: String,
    pub symbol: Option<String>,
    pub metadata: Value,
}

impl NewAsset {
    pub fn from_payload(payload: &Payload) -> Result<Self, AppError> {
        let mut fields = payload.fields();
        let name = fields.required_text("name");
        let type_id = fields.required_id("type_id");
        let symbol = fields.optional_text("symbol");
        let metadata = fields
            .optional_document("metadata")
            .unwrap_or_else(|| Value::Object(Default::default()));
        fields.finish()?;

        Ok(Self { type_id, name, symbol, metadata })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: i32,
    pub symbol: Option<String>,
    pub name: String,
}

impl From<Asset> for AssetSummary {
    fn from(value: Asset) -> Self {
        Self {
            id: value.id,
            symbol: value.symbol,
            name: value.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetCreated {
    pub id: i32,
    pub symbol: Option<String>,
}

impl From<Asset> for AssetCreated {
    fn from(value: Asset) -> Self {
        Self { id: value.id, symbol: value.symbol }
    }
}
