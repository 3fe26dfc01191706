//! Transaction entity - One income or expense record

use chrono::{DateTime, Utc};

use crate::entities::Category;
use crate::error::DomainError;
use crate::types::TransactionType;
use crate::value_objects::{Amount, Description};
use crate::{CategoryId, TransactionId, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub description: Option<Description>,
    /// When the money moved (not when it was recorded)
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Records a transaction against `category`.
    ///
    /// # Errors
    ///
    /// - `Constraint` if the category is another user's
    /// - `Validation` if the category type differs from `transaction_type`
    pub fn record(
        user_id: UserId,
        category: &Category,
        transaction_type: TransactionType,
        amount: Amount,
        description: Option<Description>,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !category.visible_to(user_id) {
            return Err(DomainError::constraint(format!(
                "Category {} does not belong to this user",
                category.id
            )));
        }
        if category.category_type != transaction_type {
            return Err(DomainError::validation(format!(
                "Category '{}' is for {} transactions, not {}",
                category.name, category.category_type, transaction_type
            )));
        }

        Ok(Self {
            id: TransactionId::new(),
            user_id,
            category_id: category.id,
            transaction_type,
            amount,
            description,
            date,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CategoryName;

    fn food() -> Category {
        Category::shared(
            CategoryName::new("Food").unwrap(),
            TransactionType::Expense,
            Utc::now(),
        )
    }

    #[test]
    fn records_against_default_category() {
        let user = UserId::new();
        let now = Utc::now();
        let tx = Transaction::record(
            user,
            &food(),
            TransactionType::Expense,
            Amount::from_cents(1250).unwrap(),
            None,
            now,
            now,
        )
        .unwrap();
        assert_eq!(tx.user_id, user);
        assert_eq!(tx.amount.to_cents(), 1250);
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let now = Utc::now();
        let result = Transaction::record(
            UserId::new(),
            &food(),
            TransactionType::Income,
            Amount::from_cents(100).unwrap(),
            None,
            now,
            now,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn foreign_category_is_rejected() {
        let now = Utc::now();
        let theirs = Category::new(
            UserId::new(),
            CategoryName::new("Books").unwrap(),
            TransactionType::Expense,
            now,
        );
        let result = Transaction::record(
            UserId::new(),
            &theirs,
            TransactionType::Expense,
            Amount::from_cents(100).unwrap(),
            None,
            now,
            now,
        );
        assert!(matches!(result, Err(DomainError::Constraint(_))));
    }
}
