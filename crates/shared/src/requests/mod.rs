//! Request bodies and query strings.
//!
//! Every struct derives `Validate`; handlers call `validate()` before
//! touching the domain, so shape errors surface as 400 with a field message.

mod auth;
mod body;
mod finance;
mod quest;
mod stats;

pub use auth::{LoginRequest, RegisterRequest};
pub use body::CreateBodyMetricRequest;
pub use finance::{CreateCategoryRequest, CreateTransactionRequest};
pub use quest::{CreateQuestRequest, ListQuestsQuery};
pub use stats::UpdateStatsRequest;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// `?skip=&limit=` for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }

    pub fn offset(&self) -> u32 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

/// Default number of leaderboard rows.
pub const DEFAULT_RANK_LIMIT: u32 = 20;

/// `?limit=` for the leaderboard; out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RankQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

impl RankQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_RANK_LIMIT).clamp(1, MAX_PAGE_LIMIT)
    }
}
