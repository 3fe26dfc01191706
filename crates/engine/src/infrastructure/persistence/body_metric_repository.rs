//! SQLite-backed body measurements.

use async_trait::async_trait;
use lifesys_domain::{BodyMetric, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::rows::{column, parsed, write_error};
use crate::infrastructure::ports::{BodyMetricRepo, RepoError};

pub struct SqliteBodyMetricRepo {
    pool: SqlitePool,
}

impl SqliteBodyMetricRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn metric_from_row(row: &SqliteRow) -> Result<BodyMetric, RepoError> {
    Ok(BodyMetric {
        id: parsed(row, "id")?,
        user_id: parsed(row, "user_id")?,
        date: column(row, "date")?,
        weight: column(row, "weight")?,
        muscle_mass: column(row, "muscle_mass")?,
        fat_percentage: column(row, "fat_percentage")?,
        photo_url: column(row, "photo_url")?,
        created_at: column(row, "created_at")?,
    })
}

#[async_trait]
impl BodyMetricRepo for SqliteBodyMetricRepo {
    async fn insert(&self, metric: &BodyMetric) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO body_metrics (id, user_id, date, weight, muscle_mass, fat_percentage,
                                      photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(metric.id.to_string())
        .bind(metric.user_id.to_string())
        .bind(metric.date)
        .bind(metric.weight)
        .bind(metric.muscle_mass)
        .bind(metric.fat_percentage)
        .bind(metric.photo_url.as_deref())
        .bind(metric.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("body_metrics.insert", e))?;
        Ok(())
    }

    async fn list_page(
        &self,
        user_id: UserId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<BodyMetric>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, date, weight, muscle_mass, fat_percentage, photo_url, created_at
            FROM body_metrics
            WHERE user_id = ?
            ORDER BY date DESC, rowid DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("body_metrics.list_page", e))?;
        rows.iter().map(metric_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::test_support::{seed_user, test_pool};
    use chrono::{Duration, Utc};
    use lifesys_domain::NewBodyMetric;

    #[tokio::test]
    async fn metrics_round_trip_and_page_newest_first() {
        let (_dir, pool) = test_pool().await;
        let user_id = seed_user(&pool, "b@example.com", "B").await;
        let repo = SqliteBodyMetricRepo::new(pool);
        let now = Utc::now();

        let older = BodyMetric::record(
            user_id,
            NewBodyMetric {
                date: Some(now - Duration::days(7)),
                weight: 81.5,
                fat_percentage: Some(18.0),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        let newer = BodyMetric::record(
            user_id,
            NewBodyMetric {
                weight: 80.9,
                muscle_mass: Some(35.2),
                photo_url: Some("https://photos.example.com/1.jpg".into()),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();

        let page = repo.list_page(user_id, 0, 10).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, newer.id);
        assert_eq!(page[0].muscle_mass, Some(35.2));
        assert_eq!(page[1].fat_percentage, Some(18.0));
        assert!(page[1].photo_url.is_none());

        assert_eq!(repo.list_page(user_id, 1, 10).await.unwrap().len(), 1);
    }
}
