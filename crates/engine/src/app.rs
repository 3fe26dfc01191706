//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::persistence::SqliteRepositories;
use crate::infrastructure::ports::ClockPort;
use crate::use_cases;

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub auth: use_cases::AuthUseCases,
    pub quests: use_cases::QuestUseCases,
    pub stats: use_cases::StatsUseCases,
    pub finance: use_cases::FinanceUseCases,
    pub body: Arc<use_cases::BodyMetricOps>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: SqliteRepositories,
        clock: Arc<dyn ClockPort>,
        session_ttl: chrono::Duration,
    ) -> Self {
        let auth = use_cases::AuthUseCases::new(
            Arc::new(use_cases::auth::Register::new(
                repos.users.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::auth::Login::new(
                repos.users.clone(),
                repos.sessions.clone(),
                clock.clone(),
                session_ttl,
            )),
            Arc::new(use_cases::auth::Logout::new(repos.sessions.clone())),
            Arc::new(use_cases::auth::Authenticate::new(
                repos.users.clone(),
                repos.sessions.clone(),
                clock.clone(),
            )),
        );

        let quests = use_cases::QuestUseCases::new(repos.quests.clone(), clock.clone());
        let stats = use_cases::StatsUseCases::new(repos.stats.clone(), clock.clone());

        let finance = use_cases::FinanceUseCases::new(
            Arc::new(use_cases::finance::TransactionOps::new(
                repos.transactions.clone(),
                repos.categories.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::finance::CategoryOps::new(
                repos.categories.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::finance::FinanceReports::new(
                repos.transactions.clone(),
                repos.categories.clone(),
            )),
        );

        let body = Arc::new(use_cases::BodyMetricOps::new(repos.body_metrics, clock));

        Self {
            use_cases: UseCases {
                auth,
                quests,
                stats,
                finance,
                body,
            },
        }
    }
}
