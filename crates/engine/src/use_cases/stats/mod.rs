//! Player stats and leaderboard use cases.

use std::sync::Arc;

use lifesys_domain::{level_for_xp, PlayerStats, UserId};
use lifesys_shared::UpdateStatsRequest;

use crate::infrastructure::ports::{ClockPort, PlayerStatsRepo, RepoError};

const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Container for stats use cases.
pub struct StatsUseCases {
    pub get: Arc<GetStats>,
    pub update: Arc<UpdateStats>,
    pub leaderboard: Arc<Leaderboard>,
}

impl StatsUseCases {
    pub fn new(stats: Arc<dyn PlayerStatsRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            get: Arc::new(GetStats::new(stats.clone())),
            update: Arc::new(UpdateStats::new(stats.clone(), clock)),
            leaderboard: Arc::new(Leaderboard::new(stats)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Player stats not found")]
    NotFound,
    #[error("Player stats kept changing; try again")]
    Conflict,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct GetStats {
    stats: Arc<dyn PlayerStatsRepo>,
}

impl GetStats {
    pub fn new(stats: Arc<dyn PlayerStatsRepo>) -> Self {
        Self { stats }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<PlayerStats, StatsError> {
        self.stats.get(user_id).await?.ok_or(StatsError::NotFound)
    }
}

/// Manual correction of streak fields. XP is never patched.
pub struct UpdateStats {
    stats: Arc<dyn PlayerStatsRepo>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateStats {
    pub fn new(stats: Arc<dyn PlayerStatsRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { stats, clock }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        request: UpdateStatsRequest,
    ) -> Result<PlayerStats, StatsError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let mut stats = self.stats.get(user_id).await?.ok_or(StatsError::NotFound)?;
            stats.update_streak(request.streak_days, request.last_activity, self.clock.now());
            if self.stats.save_if_unchanged(&stats).await? {
                stats.mark_saved();
                tracing::info!(
                    user_id = %user_id,
                    streak_days = stats.streak_days(),
                    "Player stats corrected"
                );
                return Ok(stats);
            }
        }
        Err(StatsError::Conflict)
    }
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    /// 1-based
    pub position: u32,
    pub name: String,
    pub level: u32,
    pub total_xp: u64,
    pub quests_completed: u64,
}

pub struct Leaderboard {
    stats: Arc<dyn PlayerStatsRepo>,
}

impl Leaderboard {
    pub fn new(stats: Arc<dyn PlayerStatsRepo>) -> Self {
        Self { stats }
    }

    pub async fn execute(&self, limit: u32) -> Result<Vec<RankedPlayer>, StatsError> {
        let rows = self.stats.leaderboard(limit).await?;
        Ok(rows
            .into_iter()
            .zip(1u32..)
            .map(|(row, position)| RankedPlayer {
                position,
                name: row.name,
                level: level_for_xp(row.total_xp),
                total_xp: row.total_xp,
                quests_completed: row.quests_completed,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{LeaderboardRow, MockPlayerStatsRepo};
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn update_touches_only_streak_fields() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 7, 0, 0).unwrap();
        let mut repo = MockPlayerStatsRepo::new();
        repo.expect_get()
            .returning(move |id| Ok(Some(PlayerStats::new_for_user(id, now))));
        repo.expect_save_if_unchanged()
            .withf(|stats| stats.streak_days() == 12 && stats.total_xp() == 0)
            .times(1)
            .returning(|_| Ok(true));

        let update = UpdateStats::new(Arc::new(repo), Arc::new(FixedClock(now)));
        let stats = update
            .execute(
                UserId::new(),
                UpdateStatsRequest {
                    streak_days: Some(12),
                    last_activity: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(stats.streak_days(), 12);
        assert_eq!(stats.revision(), 1);
    }

    #[tokio::test]
    async fn update_gives_up_after_repeated_conflicts() {
        let now = Utc::now();
        let mut repo = MockPlayerStatsRepo::new();
        repo.expect_get()
            .returning(move |id| Ok(Some(PlayerStats::new_for_user(id, now))));
        repo.expect_save_if_unchanged()
            .times(MAX_UPDATE_ATTEMPTS as usize)
            .returning(|_| Ok(false));

        let update = UpdateStats::new(Arc::new(repo), Arc::new(FixedClock(now)));
        let err = update
            .execute(UserId::new(), UpdateStatsRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::Conflict));
    }

    #[tokio::test]
    async fn leaderboard_numbers_positions_and_derives_levels() {
        let mut repo = MockPlayerStatsRepo::new();
        repo.expect_leaderboard()
            .withf(|limit| *limit == 2)
            .returning(|_| {
                Ok(vec![
                    LeaderboardRow {
                        name: "Ada".into(),
                        total_xp: 300,
                        quests_completed: 6,
                    },
                    LeaderboardRow {
                        name: "Bea".into(),
                        total_xp: 99,
                        quests_completed: 2,
                    },
                ])
            });

        let ranked = Leaderboard::new(Arc::new(repo)).execute(2).await.unwrap();
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[0].level, 3);
        assert_eq!(ranked[1].position, 2);
        assert_eq!(ranked[1].level, 1);
    }
}
