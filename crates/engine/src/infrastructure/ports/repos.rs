//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifesys_domain::{
    BodyMetric, Category, CategoryId, DomainError, Email, PlayerStats, Quest, QuestId, QuestStatus,
    RewardOutcome, SessionId, Transaction, User, UserId,
};

use super::error::RepoError;

// =============================================================================
// Accounts
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepoError>;
    /// Inserts the user and its initial stats row in one transaction.
    ///
    /// A duplicate email or open id is reported as `ConstraintViolation`.
    async fn create_with_stats(&self, user: &User, stats: &PlayerStats) -> Result<(), RepoError>;
    async fn record_sign_in(&self, id: UserId, at: DateTime<Utc>) -> Result<(), RepoError>;
}

/// A stored bearer session. The raw token is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: UserId,
    /// Hex SHA-256 of the bearer token
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn create(&self, session: &SessionRecord) -> Result<(), RepoError>;
    async fn find_by_token_hash(&self, token_hash: &str)
        -> Result<Option<SessionRecord>, RepoError>;
    /// Returns whether a session was removed.
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, RepoError>;
    /// Returns how many sessions were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;
}

// =============================================================================
// Gamification
// =============================================================================

/// Raw leaderboard row, already ordered by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub name: String,
    pub total_xp: u64,
    pub quests_completed: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerStatsRepo: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<PlayerStats>, RepoError>;
    /// Writes `stats` only if the stored revision still equals
    /// `stats.revision()`, bumping it by one. Returns `false` when another
    /// writer got there first.
    async fn save_if_unchanged(&self, stats: &PlayerStats) -> Result<bool, RepoError>;
    /// Ordered by total XP, then quests completed (both descending), then name.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardRow>, RepoError>;
}

/// What happened to an atomic quest completion.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Quest and stats were both written. `stats` is what was stored.
    Committed {
        stats: PlayerStats,
        reward: RewardOutcome,
    },
    /// The quest was no longer `active`; nothing was written.
    QuestNotActive,
    /// The owner has no stats row; nothing was written.
    StatsMissing,
    /// The reward could not be applied (XP overflow); nothing was written.
    RewardRejected(DomainError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestRepo: Send + Sync {
    async fn get(&self, id: QuestId) -> Result<Option<Quest>, RepoError>;
    async fn insert(&self, quest: &Quest) -> Result<(), RepoError>;
    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<QuestStatus>,
    ) -> Result<Vec<Quest>, RepoError>;
    /// Persists an `active -> cancelled/failed` transition, guarded on the
    /// stored status still being `active`. Returns `false` when it was not.
    async fn save_transition(&self, quest: &Quest) -> Result<bool, RepoError>;
    /// Writes a completed quest and credits its reward to the owner's stats
    /// as one unit.
    ///
    /// The quest update is conditional on `status = 'active'` and runs first,
    /// taking the database write lock. The stats are then read and rewarded
    /// under that lock, so concurrent completions for one player queue up
    /// instead of failing. Any outcome other than `Committed` rolls the whole
    /// unit back.
    async fn commit_completion(&self, quest: &Quest) -> Result<CommitOutcome, RepoError>;
}

// =============================================================================
// Finance
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepoError>;
    /// Shared defaults plus the user's own categories.
    async fn list_visible(&self, user_id: UserId) -> Result<Vec<Category>, RepoError>;
    async fn insert(&self, category: &Category) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepo: Send + Sync {
    async fn insert(&self, transaction: &Transaction) -> Result<(), RepoError>;
    /// Most recent `date` first.
    async fn list_page(
        &self,
        user_id: UserId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Transaction>, RepoError>;
    /// Every transaction of the user, for aggregation.
    async fn list_all(&self, user_id: UserId) -> Result<Vec<Transaction>, RepoError>;
}

// =============================================================================
// Body tracking
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BodyMetricRepo: Send + Sync {
    async fn insert(&self, metric: &BodyMetric) -> Result<(), RepoError>;
    /// Most recent `date` first.
    async fn list_page(
        &self,
        user_id: UserId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<BodyMetric>, RepoError>;
}
