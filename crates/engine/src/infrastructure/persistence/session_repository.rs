//! SQLite-backed bearer sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::rows::{column, parsed, write_error};
use crate::infrastructure::ports::{RepoError, SessionRecord, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn session_from_row(row: &SqliteRow) -> Result<SessionRecord, RepoError> {
    Ok(SessionRecord {
        id: parsed(row, "id")?,
        user_id: parsed(row, "user_id")?,
        token_hash: column(row, "token_hash")?,
        created_at: column(row, "created_at")?,
        expires_at: column(row, "expires_at")?,
    })
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn create(&self, session: &SessionRecord) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.token_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("sessions.create", e))?;
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM sessions
            WHERE token_hash = ?
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("sessions.find_by_token_hash", e))?;
        row.as_ref().map(session_from_row).transpose()
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("sessions.delete_by_token_hash", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("sessions.delete_expired", e))?;
        Ok(result.rows_affected())
    }
}
