//! SQLite-backed accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifesys_domain::{Email, PlayerName, PlayerStats, User, UserId, UserState};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::rows::{column, parsed, write_error};
use super::stats_repository::insert_stats;
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, open_id, email, name, role, login_method, password_hash,
           created_at, updated_at, last_signed_in
    FROM users
"#;

fn user_from_row(row: &SqliteRow) -> Result<User, RepoError> {
    let email: String = column(row, "email")?;
    let name: String = column(row, "name")?;
    Ok(User::from_state(UserState {
        id: parsed(row, "id")?,
        open_id: column(row, "open_id")?,
        email: Email::new(email).map_err(RepoError::serialization)?,
        name: PlayerName::new(name).map_err(RepoError::serialization)?,
        role: parsed(row, "role")?,
        login_method: column(row, "login_method")?,
        password_hash: column(row, "password_hash")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
        last_signed_in: column(row, "last_signed_in")?,
    }))
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get_by_email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_with_stats(&self, user: &User, stats: &PlayerStats) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("users.create", e))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, open_id, email, name, role, login_method, password_hash,
                               created_at, updated_at, last_signed_in)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.open_id())
        .bind(user.email().as_str())
        .bind(user.name().as_str())
        .bind(user.role().as_str())
        .bind(user.login_method())
        .bind(user.password_hash())
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_signed_in())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("users.create", e))?;

        insert_stats(&mut *tx, stats).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("users.create", e))?;
        Ok(())
    }

    async fn record_sign_in(&self, id: UserId, at: DateTime<Utc>) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE users SET last_signed_in = ?, updated_at = ? WHERE id = ?")
                .bind(at)
                .bind(at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("users.record_sign_in", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("User", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::test_support::test_pool;
    use crate::infrastructure::persistence::SqliteStatsRepo;
    use crate::infrastructure::ports::PlayerStatsRepo;

    fn new_user(email: &str) -> User {
        User::register(
            Email::new(email).unwrap(),
            PlayerName::new("Hero").unwrap(),
            "$argon2id$placeholder",
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn registration_creates_user_and_stats() {
        let (_dir, pool) = test_pool().await;
        let users = SqliteUserRepo::new(pool.clone());
        let stats_repo = SqliteStatsRepo::new(pool);

        let user = new_user("hero@example.com");
        let stats = PlayerStats::new_for_user(user.id(), user.created_at());
        users.create_with_stats(&user, &stats).await.unwrap();

        let loaded = users
            .get_by_email(&Email::new("HERO@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.id(), user.id());
        assert_eq!(loaded.name().as_str(), "Hero");

        let stats = stats_repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(stats.total_xp(), 0);
        assert_eq!(stats.level(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation_and_leaves_no_stats() {
        let (_dir, pool) = test_pool().await;
        let users = SqliteUserRepo::new(pool.clone());
        let stats_repo = SqliteStatsRepo::new(pool);

        let first = new_user("dup@example.com");
        users
            .create_with_stats(&first, &PlayerStats::new_for_user(first.id(), Utc::now()))
            .await
            .unwrap();

        let second = new_user("dup@example.com");
        let err = users
            .create_with_stats(&second, &PlayerStats::new_for_user(second.id(), Utc::now()))
            .await
            .unwrap_err();
        assert!(err.is_constraint());
        assert!(stats_repo.get(second.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_for_unknown_user_is_not_found() {
        let (_dir, pool) = test_pool().await;
        let users = SqliteUserRepo::new(pool);
        let err = users
            .record_sign_in(UserId::new(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
