//! Body measurement use cases.

use std::sync::Arc;

use lifesys_domain::{BodyMetric, DomainError, NewBodyMetric, UserId};
use lifesys_shared::{CreateBodyMetricRequest, PageQuery};

use crate::infrastructure::ports::{BodyMetricRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DomainError> for BodyError {
    fn from(err: DomainError) -> Self {
        BodyError::InvalidInput(err.to_string())
    }
}

pub struct BodyMetricOps {
    metrics: Arc<dyn BodyMetricRepo>,
    clock: Arc<dyn ClockPort>,
}

impl BodyMetricOps {
    pub fn new(metrics: Arc<dyn BodyMetricRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { metrics, clock }
    }

    pub async fn list(&self, user_id: UserId, page: PageQuery) -> Result<Vec<BodyMetric>, BodyError> {
        Ok(self
            .metrics
            .list_page(user_id, page.offset(), page.limit())
            .await?)
    }

    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateBodyMetricRequest,
    ) -> Result<BodyMetric, BodyError> {
        let metric = BodyMetric::record(
            user_id,
            NewBodyMetric {
                date: request.date,
                weight: request.weight,
                muscle_mass: request.muscle_mass,
                fat_percentage: request.fat_percentage,
                photo_url: request.photo_url,
            },
            self.clock.now(),
        )?;
        self.metrics.insert(&metric).await?;
        tracing::info!(metric_id = %metric.id, user_id = %user_id, "Body metric recorded");
        Ok(metric)
    }
}
