//! Finance use cases: transactions, categories and the aggregated views.

use std::sync::Arc;

use lifesys_domain::{
    daily_buckets, monthly_trends, summarize, Amount, Category, CategoryId, CategoryName,
    DailyBucket, Description, DomainError, FinanceSummary, HexColor, MonthlyTrends, Transaction,
    UserId,
};
use lifesys_shared::{CreateCategoryRequest, CreateTransactionRequest, PageQuery};

use crate::infrastructure::ports::{CategoryRepo, ClockPort, RepoError, TransactionRepo};

/// Container for finance use cases.
pub struct FinanceUseCases {
    pub transactions: Arc<TransactionOps>,
    pub categories: Arc<CategoryOps>,
    pub reports: Arc<FinanceReports>,
}

impl FinanceUseCases {
    pub fn new(
        transactions: Arc<TransactionOps>,
        categories: Arc<CategoryOps>,
        reports: Arc<FinanceReports>,
    ) -> Self {
        Self {
            transactions,
            categories,
            reports,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Category not found")]
    CategoryNotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DomainError> for FinanceError {
    fn from(err: DomainError) -> Self {
        FinanceError::InvalidInput(err.to_string())
    }
}

pub struct TransactionOps {
    transactions: Arc<dyn TransactionRepo>,
    categories: Arc<dyn CategoryRepo>,
    clock: Arc<dyn ClockPort>,
}

impl TransactionOps {
    pub fn new(
        transactions: Arc<dyn TransactionRepo>,
        categories: Arc<dyn CategoryRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            transactions,
            categories,
            clock,
        }
    }

    pub async fn list(&self, user_id: UserId, page: PageQuery) -> Result<Vec<Transaction>, FinanceError> {
        Ok(self
            .transactions
            .list_page(user_id, page.offset(), page.limit())
            .await?)
    }

    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, FinanceError> {
        // Another user's category reads as missing.
        let category = self
            .categories
            .get(CategoryId::from_uuid(request.category_id))
            .await?
            .filter(|category| category.visible_to(user_id))
            .ok_or(FinanceError::CategoryNotFound)?;

        let now = self.clock.now();
        let transaction = Transaction::record(
            user_id,
            &category,
            request.transaction_type,
            Amount::new(request.amount)?,
            Description::optional(request.description)?,
            request.date.unwrap_or(now),
            now,
        )?;
        self.transactions.insert(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %user_id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            "Transaction recorded"
        );
        Ok(transaction)
    }
}

pub struct CategoryOps {
    categories: Arc<dyn CategoryRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CategoryOps {
    pub fn new(categories: Arc<dyn CategoryRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { categories, clock }
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<Category>, FinanceError> {
        Ok(self.categories.list_visible(user_id).await?)
    }

    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateCategoryRequest,
    ) -> Result<Category, FinanceError> {
        let mut category = Category::new(
            user_id,
            CategoryName::new(request.name)?,
            request.category_type,
            self.clock.now(),
        );
        if let Some(icon) = request.icon {
            category = category.with_icon(icon);
        }
        if let Some(color) = request.color {
            category = category.with_color(HexColor::new(color)?);
        }
        self.categories.insert(&category).await?;

        tracing::info!(category_id = %category.id, user_id = %user_id, "Category created");
        Ok(category)
    }
}

/// Read-only aggregations over a user's whole history.
pub struct FinanceReports {
    transactions: Arc<dyn TransactionRepo>,
    categories: Arc<dyn CategoryRepo>,
}

impl FinanceReports {
    pub fn new(transactions: Arc<dyn TransactionRepo>, categories: Arc<dyn CategoryRepo>) -> Self {
        Self {
            transactions,
            categories,
        }
    }

    pub async fn summary(&self, user_id: UserId) -> Result<FinanceSummary, FinanceError> {
        let transactions = self.transactions.list_all(user_id).await?;
        let categories = self.categories.list_visible(user_id).await?;
        Ok(summarize(&transactions, &categories))
    }

    pub async fn daily(&self, user_id: UserId) -> Result<Vec<DailyBucket>, FinanceError> {
        let transactions = self.transactions.list_all(user_id).await?;
        Ok(daily_buckets(&transactions))
    }

    pub async fn trends(&self, user_id: UserId) -> Result<MonthlyTrends, FinanceError> {
        let transactions = self.transactions.list_all(user_id).await?;
        Ok(monthly_trends(&transactions))
    }
}
