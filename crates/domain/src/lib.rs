//! Life System domain: accounts, quests, the leveling rule, player stats,
//! finance records and body metrics.
//!
//! No I/O lives here. Storage and transport adapt to these types, never the
//! other way around.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod finance;
pub mod ids;
pub mod leveling;
pub mod types;
pub mod value_objects;

pub use aggregates::{
    AttributeXp, NewQuest, PlayerStats, PlayerStatsState, Quest, QuestState, RewardOutcome, User,
    UserState, LOGIN_METHOD_PASSWORD, MAX_XP_REWARD,
};
pub use entities::{default_categories, BodyMetric, Category, NewBodyMetric, Transaction};
pub use error::DomainError;
pub use events::DomainEvent;
pub use finance::{
    daily_buckets, monthly_trends, summarize, CategoryTotal, DailyBucket, FinanceSummary,
    MonthlyTotal, MonthlyTrends,
};
pub use ids::{BodyMetricId, CategoryId, QuestId, SessionId, TransactionId, UserId};
pub use leveling::{level_for_xp, xp_to_reach, LevelChange, LevelProgress};
pub use types::{Attribute, QuestDifficulty, QuestStatus, TransactionType, UserRole};
pub use value_objects::{
    Amount, CategoryName, Description, Email, HexColor, PlayerName, QuestTitle,
};
