use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::TransactionType;

/// A JSON object request body. An empty body decodes as `{}`.
#[derive(Debug, Clone, Default)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(AppError::Validation("request body must be a JSON object".into())),
            Err(e) => Err(AppError::Validation(format!("malformed JSON body: {}", e))),
        }
    }

    pub fn fields(&self) -> Fields<'_> {
        Fields {
            body: &self.0,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Payload::from_slice(&bytes)
    }
}

/// Single-pass reader over a payload's fields.
///
/// Each accessor records a missing or undecodable field instead of failing, so
/// `finish` can report every problem at once. Required accessors return a
/// placeholder when the field is unusable; callers must not use the values
/// unless `finish` succeeds.
pub struct Fields<'a> {
    body: &'a Map<String, Value>,
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl<'a> Fields<'a> {
    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.body.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn mark_missing(&mut self, name: &str) {
        self.missing.push(name.to_string());
    }

    fn mark_invalid(&mut self, name: &str, expected: &str) {
        self.invalid.push(format!("{} must be {}", name, expected));
    }

    /// Absent, null and "" all count as missing.
    pub fn required_text(&mut self, name: &str) -> String {
        match self.present(name) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) | None => {
                self.mark_missing(name);
                String::new()
            }
            Some(_) => {
                self.mark_invalid(name, "a string");
                String::new()
            }
        }
    }

    pub fn optional_text(&mut self, name: &str) -> Option<String> {
        match self.present(name) {
            Some(Value::String(s)) => Some(s.clone()),
            None => None,
            Some(_) => {
                self.mark_invalid(name, "a string");
                None
            }
        }
    }

    /// Accepts an integer or a string of digits. Absent, null and 0 count as missing.
    pub fn required_id(&mut self, name: &str) -> i32 {
        let parsed = match self.present(name) {
            None => None,
            Some(Value::Number(n)) => Some(n.as_i64().and_then(|v| i32::try_from(v).ok()).ok_or(())),
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.trim().parse::<i32>().map_err(|_| ())),
            Some(_) => Some(Err(())),
        };
        match parsed {
            Some(Ok(0)) | None => {
                self.mark_missing(name);
                0
            }
            Some(Ok(id)) => id,
            Some(Err(())) => {
                self.mark_invalid(name, "an integer id");
                0
            }
        }
    }

    /// Only absent and null count as missing; zero is a valid amount.
    pub fn required_decimal(&mut self, name: &str) -> BigDecimal {
        match self.optional_decimal_inner(name) {
            Some(value) => value,
            None => {
                if self.present(name).is_none() {
                    self.mark_missing(name);
                }
                BigDecimal::from(0)
            }
        }
    }

    pub fn optional_decimal(&mut self, name: &str) -> Option<BigDecimal> {
        self.optional_decimal_inner(name)
    }

    fn optional_decimal_inner(&mut self, name: &str) -> Option<BigDecimal> {
        let value = self.present(name)?;
        let parsed = match value {
            Value::String(s) => s.trim().parse::<BigDecimal>().ok(),
            Value::Number(n) => n.to_string().parse::<BigDecimal>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.mark_invalid(name, "a decimal number");
        }
        parsed
    }

    /// Any JSON value, kept as an opaque document.
    pub fn optional_document(&mut self, name: &str) -> Option<Value> {
        self.present(name).cloned()
    }

    /// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
    pub fn optional_timestamp(&mut self, name: &str) -> Option<DateTime<Utc>> {
        let value = self.present(name)?;
        let parsed = match value {
            Value::String(s) if !s.is_empty() => parse_timestamp(s),
            Value::String(_) => return None,
            _ => None,
        };
        if parsed.is_none() {
            self.mark_invalid(name, "an ISO 8601 timestamp");
        }
        parsed
    }

    pub fn required_transaction_type(&mut self, name: &str) -> TransactionType {
        let text = self.required_text(name);
        if text.is_empty() {
            return TransactionType::Buy;
        }
        match text.parse::<TransactionType>() {
            Ok(kind) => kind,
            Err(_) => {
                let allowed: Vec<&str> = TransactionType::ALL.iter().map(|t| t.as_str()).collect();
                let expected = format!("one of {}", allowed.join(", "));
                self.mark_invalid(name, &expected);
                TransactionType::Buy
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() && self.invalid.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidPayload {
                missing: self.missing,
                invalid: self.invalid,
            })
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
