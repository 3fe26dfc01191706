//! SQLite-backed player stats.
//!
//! Every write is a compare-and-swap on `revision`. The load/insert/update
//! helpers take a bare connection so the quest repository can run them inside
//! its completion transaction.

use async_trait::async_trait;
use lifesys_domain::{AttributeXp, PlayerStats, PlayerStatsState, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};

use super::rows::{column, parsed, to_sql_int, unsigned, write_error};
use crate::infrastructure::ports::{LeaderboardRow, PlayerStatsRepo, RepoError};

pub struct SqliteStatsRepo {
    pool: SqlitePool,
}

impl SqliteStatsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn stats_from_row(row: &SqliteRow) -> Result<PlayerStats, RepoError> {
    let streak: i64 = column(row, "streak_days")?;
    Ok(PlayerStats::from_state(PlayerStatsState {
        user_id: parsed(row, "user_id")?,
        total_xp: unsigned(row, "total_xp")?,
        attribute_xp: AttributeXp {
            strength: unsigned(row, "strength_xp")?,
            intelligence: unsigned(row, "intelligence_xp")?,
            charisma: unsigned(row, "charisma_xp")?,
            vitality: unsigned(row, "vitality_xp")?,
            wisdom: unsigned(row, "wisdom_xp")?,
            agility: unsigned(row, "agility_xp")?,
        },
        quests_completed: unsigned(row, "quests_completed")?,
        streak_days: u32::try_from(streak)
            .map_err(|_| RepoError::serialization(format!("streak_days: {streak}")))?,
        last_activity: column(row, "last_activity")?,
        revision: unsigned(row, "revision")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    }))
}

const SELECT_STATS: &str = r#"
    SELECT user_id, total_xp, strength_xp, intelligence_xp, charisma_xp, vitality_xp,
           wisdom_xp, agility_xp, quests_completed, streak_days, last_activity,
           revision, created_at, updated_at
    FROM player_stats
    WHERE user_id = ?
"#;

/// Reads the stats row on `conn`, so a caller holding a transaction sees its
/// own snapshot.
pub(crate) async fn load_stats(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<Option<PlayerStats>, RepoError> {
    let row = sqlx::query(SELECT_STATS)
        .bind(user_id.to_string())
        .fetch_optional(conn)
        .await
        .map_err(|e| RepoError::database("player_stats.load", e))?;
    row.as_ref().map(stats_from_row).transpose()
}

/// Column values shared by insert and update.
struct StatsColumns {
    total_xp: i64,
    xp: [i64; 6],
    quests_completed: i64,
    revision: i64,
}

impl StatsColumns {
    fn of(stats: &PlayerStats) -> Result<Self, RepoError> {
        let a = stats.attribute_xp();
        Ok(Self {
            total_xp: to_sql_int(stats.total_xp(), "total_xp")?,
            xp: [
                to_sql_int(a.strength, "strength_xp")?,
                to_sql_int(a.intelligence, "intelligence_xp")?,
                to_sql_int(a.charisma, "charisma_xp")?,
                to_sql_int(a.vitality, "vitality_xp")?,
                to_sql_int(a.wisdom, "wisdom_xp")?,
                to_sql_int(a.agility, "agility_xp")?,
            ],
            quests_completed: to_sql_int(stats.quests_completed(), "quests_completed")?,
            revision: to_sql_int(stats.revision(), "revision")?,
        })
    }
}

pub(crate) async fn insert_stats(
    conn: &mut SqliteConnection,
    stats: &PlayerStats,
) -> Result<(), RepoError> {
    let cols = StatsColumns::of(stats)?;
    sqlx::query(
        r#"
        INSERT INTO player_stats (user_id, total_xp, strength_xp, intelligence_xp, charisma_xp,
                                  vitality_xp, wisdom_xp, agility_xp, quests_completed,
                                  streak_days, last_activity, revision, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(stats.user_id().to_string())
    .bind(cols.total_xp)
    .bind(cols.xp[0])
    .bind(cols.xp[1])
    .bind(cols.xp[2])
    .bind(cols.xp[3])
    .bind(cols.xp[4])
    .bind(cols.xp[5])
    .bind(cols.quests_completed)
    .bind(i64::from(stats.streak_days()))
    .bind(stats.last_activity())
    .bind(cols.revision)
    .bind(stats.created_at())
    .bind(stats.updated_at())
    .execute(conn)
    .await
    .map_err(|e| write_error("player_stats.insert", e))?;
    Ok(())
}

/// Writes `stats` if the stored revision equals `stats.revision()`.
pub(crate) async fn update_stats_if_unchanged(
    conn: &mut SqliteConnection,
    stats: &PlayerStats,
) -> Result<bool, RepoError> {
    let cols = StatsColumns::of(stats)?;
    let result = sqlx::query(
        r#"
        UPDATE player_stats
        SET total_xp = ?, strength_xp = ?, intelligence_xp = ?, charisma_xp = ?,
            vitality_xp = ?, wisdom_xp = ?, agility_xp = ?, quests_completed = ?,
            streak_days = ?, last_activity = ?, updated_at = ?,
            revision = revision + 1
        WHERE user_id = ? AND revision = ?
        "#,
    )
    .bind(cols.total_xp)
    .bind(cols.xp[0])
    .bind(cols.xp[1])
    .bind(cols.xp[2])
    .bind(cols.xp[3])
    .bind(cols.xp[4])
    .bind(cols.xp[5])
    .bind(cols.quests_completed)
    .bind(i64::from(stats.streak_days()))
    .bind(stats.last_activity())
    .bind(stats.updated_at())
    .bind(stats.user_id().to_string())
    .bind(cols.revision)
    .execute(conn)
    .await
    .map_err(|e| write_error("player_stats.update", e))?;
    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl PlayerStatsRepo for SqliteStatsRepo {
    async fn get(&self, user_id: UserId) -> Result<Option<PlayerStats>, RepoError> {
        let row = sqlx::query(SELECT_STATS)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("player_stats.get", e))?;
        row.as_ref().map(stats_from_row).transpose()
    }

    async fn save_if_unchanged(&self, stats: &PlayerStats) -> Result<bool, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("player_stats.update", e))?;
        update_stats_if_unchanged(&mut *conn, stats).await
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardRow>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT u.name, s.total_xp, s.quests_completed
            FROM player_stats s
            JOIN users u ON u.id = s.user_id
            ORDER BY s.total_xp DESC, s.quests_completed DESC, u.name ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("player_stats.leaderboard", e))?;

        rows.iter()
            .map(|row| {
                Ok(LeaderboardRow {
                    name: column(row, "name")?,
                    total_xp: unsigned(row, "total_xp")?,
                    quests_completed: unsigned(row, "quests_completed")?,
                })
            })
            .collect()
    }
}
