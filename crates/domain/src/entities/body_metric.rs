//! BodyMetric entity - A dated body measurement

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::{BodyMetricId, UserId};

const MAX_PHOTO_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq)]
pub struct BodyMetric {
    pub id: BodyMetricId,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    /// Kilograms, > 0
    pub weight: f64,
    /// Kilograms, >= 0
    pub muscle_mass: Option<f64>,
    /// Percent, 0..=100
    pub fat_percentage: Option<f64>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a measurement.
#[derive(Debug, Clone, Default)]
pub struct NewBodyMetric {
    pub date: Option<DateTime<Utc>>,
    pub weight: f64,
    pub muscle_mass: Option<f64>,
    pub fat_percentage: Option<f64>,
    pub photo_url: Option<String>,
}

impl BodyMetric {
    /// Validates and records a measurement; `date` defaults to `now`.
    pub fn record(
        user_id: UserId,
        input: NewBodyMetric,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !input.weight.is_finite() || input.weight <= 0.0 {
            return Err(DomainError::validation("Weight must be greater than zero"));
        }
        if let Some(muscle) = input.muscle_mass {
            if !muscle.is_finite() || muscle < 0.0 {
                return Err(DomainError::validation("Muscle mass cannot be negative"));
            }
        }
        if let Some(fat) = input.fat_percentage {
            if !fat.is_finite() || !(0.0..=100.0).contains(&fat) {
                return Err(DomainError::validation(
                    "Fat percentage must be between 0 and 100",
                ));
            }
        }
        let photo_url = input
            .photo_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if photo_url
            .as_ref()
            .is_some_and(|url| url.len() > MAX_PHOTO_URL_LENGTH)
        {
            return Err(DomainError::validation("Photo URL is too long"));
        }

        Ok(Self {
            id: BodyMetricId::new(),
            user_id,
            date: input.date.unwrap_or(now),
            weight: input.weight,
            muscle_mass: input.muscle_mass,
            fat_percentage: input.fat_percentage,
            photo_url,
            created_at: now,
        })
    }
}
