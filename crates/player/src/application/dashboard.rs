//! Data behind the dashboard screen.
//!
//! Everything is fetched on demand. After completing a quest the stats and
//! quest list are fetched again rather than patched locally.

use lifesys_shared::{
    LeaderboardEntry, PlayerStatsResponse, QuestCompleteResponse, QuestResponse, QuestStatus,
};
use uuid::Uuid;

use super::{ClientError, LifeClient};

/// Rows shown in the dashboard's leaderboard panel.
pub const LEADERBOARD_ROWS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub stats: PlayerStatsResponse,
    pub active_quests: Vec<QuestResponse>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

pub async fn load(client: &LifeClient) -> Result<DashboardData, ClientError> {
    let stats = client.player_stats().await?;
    let active_quests = client.list_quests(Some(QuestStatus::Active)).await?;
    let leaderboard = client.leaderboard(Some(LEADERBOARD_ROWS)).await?.entries;
    Ok(DashboardData {
        stats,
        active_quests,
        leaderboard,
    })
}

/// Completes `quest_id`, then reloads the whole dashboard.
pub async fn complete_and_refresh(
    client: &LifeClient,
    quest_id: Uuid,
) -> Result<(QuestCompleteResponse, DashboardData), ClientError> {
    let completed = client.complete_quest(quest_id).await?;
    tracing::info!(
        quest_id = %quest_id,
        xp_gained = completed.xp_gained,
        level_up = completed.level_up,
        "Quest completed"
    );
    let data = load(client).await?;
    Ok((completed, data))
}
