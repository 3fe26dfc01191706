//! SQLite persistence adapters
//!
//! One repository per port, all sharing a single connection pool.

mod body_metric_repository;
mod category_repository;
mod connection;
mod quest_repository;
mod rows;
mod session_repository;
mod stats_repository;
mod transaction_repository;
mod user_repository;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub use body_metric_repository::SqliteBodyMetricRepo;
pub use category_repository::SqliteCategoryRepo;
pub use connection::{bootstrap_schema, connect, seed_default_categories};
pub use quest_repository::SqliteQuestRepo;
pub use session_repository::SqliteSessionRepo;
pub use stats_repository::SqliteStatsRepo;
pub use transaction_repository::SqliteTransactionRepo;
pub use user_repository::SqliteUserRepo;

use crate::infrastructure::ports::{
    BodyMetricRepo, CategoryRepo, PlayerStatsRepo, QuestRepo, RepoError, SessionRepo,
    TransactionRepo, UserRepo,
};

/// Every repository the engine uses, behind its port trait.
#[derive(Clone)]
pub struct SqliteRepositories {
    pub users: Arc<dyn UserRepo>,
    pub sessions: Arc<dyn SessionRepo>,
    pub stats: Arc<dyn PlayerStatsRepo>,
    pub quests: Arc<dyn QuestRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub transactions: Arc<dyn TransactionRepo>,
    pub body_metrics: Arc<dyn BodyMetricRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
            sessions: Arc::new(SqliteSessionRepo::new(pool.clone())),
            stats: Arc::new(SqliteStatsRepo::new(pool.clone())),
            quests: Arc::new(SqliteQuestRepo::new(pool.clone())),
            categories: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            transactions: Arc::new(SqliteTransactionRepo::new(pool.clone())),
            body_metrics: Arc::new(SqliteBodyMetricRepo::new(pool)),
        }
    }

    /// Connects, creates missing tables and seeds the default categories.
    pub async fn open(database_url: &str, now: DateTime<Utc>) -> Result<Self, RepoError> {
        let pool = connect(database_url).await?;
        bootstrap_schema(&pool).await?;
        seed_default_categories(&pool, now).await?;
        Ok(Self::new(pool))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use lifesys_domain::{Email, PlayerName, PlayerStats, User, UserId};
    use tempfile::TempDir;

    /// A fresh, bootstrapped database in a temp dir. Keep the dir alive for
    /// as long as the pool is used.
    pub(crate) async fn test_pool() -> (TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let pool = connect(&url).await.unwrap();
        bootstrap_schema(&pool).await.unwrap();
        seed_default_categories(&pool, Utc::now()).await.unwrap();
        (dir, pool)
    }

    pub(crate) async fn seed_user(pool: &SqlitePool, email: &str, name: &str) -> UserId {
        let now = Utc::now();
        let user = User::register(
            Email::new(email).unwrap(),
            PlayerName::new(name).unwrap(),
            "$argon2id$test",
            now,
        );
        let stats = PlayerStats::new_for_user(user.id(), now);
        SqliteUserRepo::new(pool.clone())
            .create_with_stats(&user, &stats)
            .await
            .unwrap();
        user.id()
    }
}
