use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::payload::Payload;

// A category of tradable instrument (stock, bond, crypto, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssetType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub schema_hint: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct NewAssetType {
    pub name: String,
    pub description: Option<String>,
    pub schema_hint: Option<Value>,
}

impl NewAssetType {
    pub fn from_payload(payload: &Payload) -> Result<Self, AppError> {
        let mut fields = payload.fields();
        let name = fields.required_text("name");
        let description = fields.optional_text("description");
        let schema_hint = fields.optional_document("schema_hint");
        fields.finish()?;

        Ok(Self { name, description, schema_hint })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetTypeSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<AssetType> for AssetTypeSummary {
    fn from(value: AssetType) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetTypeCreated {
    pub id: i32,
    pub name: String,
}

impl From<AssetType> for AssetTypeCreated {
    fn from(value: AssetType) -> Self {
        Self { id: value.id, name: value.name }
    }
}
