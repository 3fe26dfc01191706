//! Response bodies.
//!
//! Money travels as decimal strings (`rust_decimal` default serde), times as
//! RFC 3339, ids as bare UUID strings.

use chrono::{DateTime, NaiveDate, Utc};
use lifesys_domain::types::{
    Attribute, QuestDifficulty, QuestStatus, TransactionType, UserRole,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Errors & health
// =============================================================================

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `conflict`
    pub error: String,
    /// Human-readable explanation
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub login_method: String,
    pub created_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

// =============================================================================
// Quests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub difficulty: QuestDifficulty,
    pub attribute: Attribute,
    pub xp_reward: u32,
    pub status: QuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of completing a quest: the updated quest, what changed, and the
/// player's stats after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestCompleteResponse {
    pub quest: QuestResponse,
    pub xp_gained: u64,
    pub attribute: Attribute,
    pub level_up: bool,
    pub old_level: u32,
    pub new_level: u32,
    pub attribute_level_up: bool,
    pub attribute_old_level: u32,
    pub attribute_new_level: u32,
    pub stats: PlayerStatsResponse,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpireOverdueResponse {
    /// Quests moved from `active` to `failed`
    pub expired: Vec<Uuid>,
}

// =============================================================================
// Player stats
// =============================================================================

/// One XP track and where it sits on the level curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeStatsResponse {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributesResponse {
    pub strength: AttributeStatsResponse,
    pub intelligence: AttributeStatsResponse,
    pub charisma: AttributeStatsResponse,
    pub vitality: AttributeStatsResponse,
    pub wisdom: AttributeStatsResponse,
    pub agility: AttributeStatsResponse,
}

impl AttributesResponse {
    pub fn get(&self, attribute: Attribute) -> &AttributeStatsResponse {
        match attribute {
            Attribute::Strength => &self.strength,
            Attribute::Intelligence => &self.intelligence,
            Attribute::Charisma => &self.charisma,
            Attribute::Vitality => &self.vitality,
            Attribute::Wisdom => &self.wisdom,
            Attribute::Agility => &self.agility,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsResponse {
    pub user_id: Uuid,
    pub level: u32,
    pub total_xp: u64,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    pub progress_percentage: f64,
    pub attributes: AttributesResponse,
    pub quests_completed: u64,
    pub streak_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Finance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotalResponse {
    pub category_id: Uuid,
    pub name: String,
    pub total: Decimal,
    pub count: u64,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSummaryResponse {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_by_category: Vec<CategoryTotalResponse>,
    pub expense_by_category: Vec<CategoryTotalResponse>,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucketResponse {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFinanceResponse {
    pub days: Vec<DailyBucketResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotalResponse {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTrendsResponse {
    pub months: Vec<MonthlyTotalResponse>,
    pub average_income: Decimal,
    pub average_expense: Decimal,
}

// =============================================================================
// Body metrics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricResponse {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Leaderboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based
    pub position: u32,
    pub name: String,
    pub level: u32,
    pub total_xp: u64,
    pub quests_completed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}
