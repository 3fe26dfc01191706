//! SQLite-backed finance transactions. Amounts are stored as integer cents.

use async_trait::async_trait;
use lifesys_domain::{Amount, Description, Transaction, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::rows::{column, parsed, write_error};
use crate::infrastructure::ports::{RepoError, TransactionRepo};

pub struct SqliteTransactionRepo {
    pool: SqlitePool,
}

impl SqliteTransactionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_TRANSACTION: &str = r#"
    SELECT id, user_id, category_id, type, amount_cents, description, date,
           created_at, updated_at
    FROM transactions
    WHERE user_id = ?
    ORDER BY date DESC, rowid DESC
"#;

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, RepoError> {
    let cents: i64 = column(row, "amount_cents")?;
    let description: Option<String> = column(row, "description")?;
    Ok(Transaction {
        id: parsed(row, "id")?,
        user_id: parsed(row, "user_id")?,
        category_id: parsed(row, "category_id")?,
        transaction_type: parsed(row, "type")?,
        amount: Amount::from_cents(cents).map_err(RepoError::serialization)?,
        description: Description::optional(description).map_err(RepoError::serialization)?,
        date: column(row, "date")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

#[async_trait]
impl TransactionRepo for SqliteTransactionRepo {
    async fn insert(&self, transaction: &Transaction) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, category_id, type, amount_cents, description,
                                      date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.user_id.to_string())
        .bind(transaction.category_id.to_string())
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.amount.to_cents())
        .bind(transaction.description.as_ref().map(|d| d.as_str()))
        .bind(transaction.date)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("transactions.insert", e))?;
        Ok(())
    }

    async fn list_page(
        &self,
        user_id: UserId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Transaction>, RepoError> {
        let rows = sqlx::query(&format!("{SELECT_TRANSACTION} LIMIT ? OFFSET ?"))
            .bind(user_id.to_string())
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("transactions.list_page", e))?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn list_all(&self, user_id: UserId) -> Result<Vec<Transaction>, RepoError> {
        let rows = sqlx::query(SELECT_TRANSACTION)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("transactions.list_all", e))?;
        rows.iter().map(transaction_from_row).collect()
    }
}
