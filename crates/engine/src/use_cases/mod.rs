//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area. Use cases orchestrate
//! domain aggregates and repository ports; they never see HTTP types.

pub mod auth;
pub mod body;
pub mod finance;
pub mod quest;
pub mod stats;

pub use auth::{AuthError, AuthUseCases, LoginResult};
pub use body::{BodyError, BodyMetricOps};
pub use finance::{FinanceError, FinanceUseCases};
pub use quest::{QuestCompletion, QuestError, QuestUseCases};
pub use stats::{RankedPlayer, StatsError, StatsUseCases};
