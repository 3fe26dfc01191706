//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Exposes behavior through methods, not public fields
//! - Can be rebuilt from storage through a `*State` struct
//!
//! # Rustic DDD Principles
//!
//! | Pattern | Rustic Equivalent |
//! |---------|-------------------|
//! | Private fields + getters | Newtypes valid by construction |
//! | Guarded state machine | `&mut self` transitions returning `Result` |
//! | Factory pattern | `::create()` / `::register()` taking `now` |

pub mod player_stats;
pub mod quest;
pub mod user;

pub use player_stats::{AttributeXp, PlayerStats, PlayerStatsState, RewardOutcome};
pub use quest::{NewQuest, Quest, QuestState, MAX_XP_REWARD};
pub use user::{User, UserState, LOGIN_METHOD_PASSWORD};
