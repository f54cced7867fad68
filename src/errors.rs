use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid payload: {}", describe_fields(.missing, .invalid))]
    InvalidPayload {
        missing: Vec<String>,
        invalid: Vec<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::InvalidPayload { missing, invalid } => {
                let body = json!({
                    "error": describe_fields(&missing, &invalid),
                    "missing": missing,
                    "invalid": invalid,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Renders "a, b and c required; x must be ..." for the fields a payload failed on.
pub fn describe_fields(missing: &[String], invalid: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("{} required", join_names(missing)));
    }
    parts.extend(invalid.iter().cloned());
    parts.join("; ")
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
