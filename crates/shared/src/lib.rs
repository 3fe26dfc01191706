//! Life System Shared - Wire types for Engine and Player communication
//!
//! This crate contains every JSON body exchanged over the REST API:
//! - One request struct per mutating endpoint, validated with `validator`
//! - One response struct per endpoint
//! - The error body returned for every non-2xx status
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **No domain IDs** - use raw `uuid::Uuid` in DTOs
//! 3. **Shared vocabulary** - enums come from `lifesys_domain::types` so the
//!    spelling on the wire matches storage

pub mod requests;
pub mod responses;

/// Prefix for every versioned route.
pub const API_PREFIX: &str = "/api/v1";

/// Value of `token_type` in login responses.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

pub use lifesys_domain::types::{Attribute, QuestDifficulty, QuestStatus, TransactionType, UserRole};

pub use requests::{
    CreateBodyMetricRequest, CreateCategoryRequest, CreateQuestRequest, CreateTransactionRequest,
    ListQuestsQuery, LoginRequest, PageQuery, RankQuery, RegisterRequest, UpdateStatsRequest,
};
pub use responses::{
    AttributeStatsResponse, AttributesResponse, BodyMetricResponse, CategoryResponse,
    CategoryTotalResponse, DailyBucketResponse, DailyFinanceResponse, ErrorBody,
    ExpireOverdueResponse, FinanceSummaryResponse, FinanceTrendsResponse, HealthResponse,
    LeaderboardEntry, LeaderboardResponse, MonthlyTotalResponse, PlayerStatsResponse,
    QuestCompleteResponse, QuestResponse, TokenResponse, TransactionResponse, UserResponse,
};
