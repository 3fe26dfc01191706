//! SQLite-backed finance categories.

use async_trait::async_trait;
use lifesys_domain::{Category, CategoryId, CategoryName, HexColor, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::rows::{column, parsed, parsed_opt, write_error};
use crate::infrastructure::ports::{CategoryRepo, RepoError};

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_CATEGORY: &str = r#"
    SELECT id, user_id, name, type, icon, color, created_at
    FROM categories
"#;

fn category_from_row(row: &SqliteRow) -> Result<Category, RepoError> {
    let name: String = column(row, "name")?;
    let color: Option<String> = column(row, "color")?;
    Ok(Category {
        id: parsed(row, "id")?,
        user_id: parsed_opt(row, "user_id")?,
        name: CategoryName::new(name).map_err(RepoError::serialization)?,
        category_type: parsed(row, "type")?,
        icon: column(row, "icon")?,
        color: color
            .map(HexColor::new)
            .transpose()
            .map_err(RepoError::serialization)?,
        created_at: column(row, "created_at")?,
    })
}

#[async_trait]
impl CategoryRepo for SqliteCategoryRepo {
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_CATEGORY} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("categories.get", e))?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn list_visible(&self, user_id: UserId) -> Result<Vec<Category>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_CATEGORY} WHERE user_id IS NULL OR user_id = ? ORDER BY type, name"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("categories.list_visible", e))?;
        rows.iter().map(category_from_row).collect()
    }

    async fn insert(&self, category: &Category) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, type, icon, color, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(category.user_id.map(|id| id.to_string()))
        .bind(category.name.as_str())
        .bind(category.category_type.as_str())
        .bind(category.icon.as_deref())
        .bind(category.color.as_ref().map(|c| c.as_str()))
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("categories.insert", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::test_support::{seed_user, test_pool};
    use chrono::Utc;
    use lifesys_domain::default_categories::DEFAULT_CATEGORIES;
    use lifesys_domain::TransactionType;

    #[tokio::test]
    async fn users_see_defaults_and_only_their_own_categories() {
        let (_dir, pool) = test_pool().await;
        let alice = seed_user(&pool, "alice@example.com", "Alice").await;
        let bob = seed_user(&pool, "bob@example.com", "Bob").await;
        let repo = SqliteCategoryRepo::new(pool);

        let mine = Category::new(
            alice,
            CategoryName::new("Books").unwrap(),
            TransactionType::Expense,
            Utc::now(),
        )
        .with_color(HexColor::new("#112233").unwrap());
        repo.insert(&mine).await.unwrap();

        let for_alice = repo.list_visible(alice).await.unwrap();
        assert_eq!(for_alice.len(), DEFAULT_CATEGORIES.len() + 1);
        assert!(for_alice.iter().any(|c| c.id == mine.id));

        let for_bob = repo.list_visible(bob).await.unwrap();
        assert_eq!(for_bob.len(), DEFAULT_CATEGORIES.len());
        assert!(for_bob.iter().all(Category::is_default));

        let loaded = repo.get(mine.id).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, Some(alice));
        assert_eq!(loaded.name, mine.name);
        assert_eq!(loaded.color, mine.color);
    }
}
