use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateBodyMetricRequest {
    /// Defaults to the time of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Kilograms
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub muscle_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub photo_url: Option<String>,
}
