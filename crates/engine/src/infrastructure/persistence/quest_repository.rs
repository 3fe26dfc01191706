//! SQLite-backed quests, including the atomic completion commit.

use async_trait::async_trait;
use lifesys_domain::{Description, Quest, QuestId, QuestState, QuestStatus, QuestTitle, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::rows::{column, parsed, write_error};
use super::stats_repository::{load_stats, update_stats_if_unchanged};
use crate::infrastructure::ports::{CommitOutcome, QuestRepo, RepoError};

pub struct SqliteQuestRepo {
    pool: SqlitePool,
}

impl SqliteQuestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_QUEST: &str = r#"
    SELECT id, user_id, title, description, difficulty, attribute, xp_reward, status,
           due_date, completed_at, created_at, updated_at
    FROM quests
"#;

fn quest_from_row(row: &SqliteRow) -> Result<Quest, RepoError> {
    let title: String = column(row, "title")?;
    let description: Option<String> = column(row, "description")?;
    let xp_reward: i64 = column(row, "xp_reward")?;
    Quest::from_state(QuestState {
        id: parsed(row, "id")?,
        user_id: parsed(row, "user_id")?,
        title: QuestTitle::new(title).map_err(RepoError::serialization)?,
        description: Description::optional(description).map_err(RepoError::serialization)?,
        difficulty: parsed(row, "difficulty")?,
        attribute: parsed(row, "attribute")?,
        xp_reward: u32::try_from(xp_reward)
            .map_err(|_| RepoError::serialization(format!("xp_reward: {xp_reward}")))?,
        status: parsed(row, "status")?,
        due_date: column(row, "due_date")?,
        completed_at: column(row, "completed_at")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
    .map_err(RepoError::serialization)
}

const GUARDED_STATUS_UPDATE: &str = r#"
    UPDATE quests
    SET status = ?, completed_at = ?, updated_at = ?
    WHERE id = ? AND status = 'active'
"#;

#[async_trait]
impl QuestRepo for SqliteQuestRepo {
    async fn get(&self, id: QuestId) -> Result<Option<Quest>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_QUEST} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("quests.get", e))?;
        row.as_ref().map(quest_from_row).transpose()
    }

    async fn insert(&self, quest: &Quest) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO quests (id, user_id, title, description, difficulty, attribute, xp_reward,
                                status, due_date, completed_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(quest.id().to_string())
        .bind(quest.user_id().to_string())
        .bind(quest.title().as_str())
        .bind(quest.description().map(|d| d.as_str()))
        .bind(quest.difficulty().as_str())
        .bind(quest.attribute().as_str())
        .bind(i64::from(quest.xp_reward()))
        .bind(quest.status().as_str())
        .bind(quest.due_date())
        .bind(quest.completed_at())
        .bind(quest.created_at())
        .bind(quest.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("quests.insert", e))?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<QuestStatus>,
    ) -> Result<Vec<Quest>, RepoError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{SELECT_QUEST} WHERE user_id = ? AND status = ? ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(user_id.to_string())
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "{SELECT_QUEST} WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepoError::database("quests.list_for_user", e))?;

        rows.iter().map(quest_from_row).collect()
    }

    async fn save_transition(&self, quest: &Quest) -> Result<bool, RepoError> {
        let result = sqlx::query(GUARDED_STATUS_UPDATE)
            .bind(quest.status().as_str())
            .bind(quest.completed_at())
            .bind(quest.updated_at())
            .bind(quest.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("quests.save_transition", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn commit_completion(&self, quest: &Quest) -> Result<CommitOutcome, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("quests.commit_completion", e))?;

        // First statement of the transaction is a write, so SQLite hands out
        // the write lock here (waiting up to the busy timeout) and every read
        // below sees the latest committed stats.
        let claimed = sqlx::query(GUARDED_STATUS_UPDATE)
            .bind(quest.status().as_str())
            .bind(quest.completed_at())
            .bind(quest.updated_at())
            .bind(quest.id().to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error("quests.commit_completion", e))?;

        if claimed.rows_affected() != 1 {
            rollback(tx).await?;
            return Ok(CommitOutcome::QuestNotActive);
        }

        let Some(mut stats) = load_stats(&mut *tx, quest.user_id()).await? else {
            rollback(tx).await?;
            return Ok(CommitOutcome::StatsMissing);
        };

        let now = quest.completed_at().unwrap_or_else(|| quest.updated_at());
        let reward = match stats.apply_quest_reward(quest.attribute(), quest.xp_reward(), now) {
            Ok(reward) => reward,
            Err(err) => {
                rollback(tx).await?;
                return Ok(CommitOutcome::RewardRejected(err));
            }
        };

        if !update_stats_if_unchanged(&mut *tx, &stats).await? {
            rollback(tx).await?;
            return Err(RepoError::database(
                "quests.commit_completion",
                "player_stats revision moved while holding the write lock",
            ));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("quests.commit_completion", e))?;
        stats.mark_saved();
        Ok(CommitOutcome::Committed { stats, reward })
    }
}

async fn rollback(tx: Transaction<'_, Sqlite>) -> Result<(), RepoError> {
    tx.rollback()
        .await
        .map_err(|e| RepoError::database("quests.commit_completion", e))
}
