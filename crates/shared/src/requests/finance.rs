use chrono::{DateTime, Utc};
use lifesys_domain::types::TransactionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub category_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Positive, at most two decimals. Accepts a JSON string or number.
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Defaults to the time of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    /// `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 7))]
    pub color: Option<String>,
}
