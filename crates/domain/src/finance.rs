//! Finance aggregation over a user's transactions.
//!
//! Pure functions: callers load the rows, these fold them. All sums are
//! exact `Decimal` arithmetic.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{Category, Transaction};
use crate::types::TransactionType;
use crate::CategoryId;

/// Income and expense recorded on one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Sum for one category within its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub total: Decimal,
    pub count: u64,
    /// Share of the type's total, 0..=100 with two decimals
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrends {
    pub months: Vec<MonthlyTotal>,
    pub average_income: Decimal,
    pub average_expense: Decimal,
}

/// Groups transactions by calendar date, ordered oldest first.
///
/// Income and expense accumulate independently; a date with only expenses
/// reports zero income.
pub fn daily_buckets(transactions: &[Transaction]) -> Vec<DailyBucket> {
    let mut by_date: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let entry = by_date.entry(tx.date.date_naive()).or_default();
        match tx.transaction_type {
            TransactionType::Income => entry.0 += tx.amount.value(),
            TransactionType::Expense => entry.1 += tx.amount.value(),
        }
    }
    by_date
        .into_iter()
        .map(|(date, (income, expense))| DailyBucket {
            date,
            income,
            expense,
        })
        .collect()
}

/// Totals plus a per-category breakdown for each type.
///
/// `categories` resolves names; an unknown id is reported as "Uncategorized".
pub fn summarize(transactions: &[Transaction], categories: &[Category]) -> FinanceSummary {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut income: BTreeMap<CategoryId, (Decimal, u64)> = BTreeMap::new();
    let mut expense: BTreeMap<CategoryId, (Decimal, u64)> = BTreeMap::new();
    let (mut total_income, mut total_expense) = (Decimal::ZERO, Decimal::ZERO);

    for tx in transactions {
        let (bucket, total) = match tx.transaction_type {
            TransactionType::Income => (&mut income, &mut total_income),
            TransactionType::Expense => (&mut expense, &mut total_expense),
        };
        let entry = bucket.entry(tx.category_id).or_default();
        entry.0 += tx.amount.value();
        entry.1 += 1;
        *total += tx.amount.value();
    }

    let breakdown = |bucket: BTreeMap<CategoryId, (Decimal, u64)>, total: Decimal| {
        let mut rows: Vec<CategoryTotal> = bucket
            .into_iter()
            .map(|(category_id, (sum, count))| CategoryTotal {
                category_id,
                name: names
                    .get(&category_id)
                    .copied()
                    .unwrap_or("Uncategorized")
                    .to_string(),
                total: sum,
                count,
                percentage: percentage_of(sum, total),
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        rows
    };

    FinanceSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_by_category: breakdown(income, total_income),
        expense_by_category: breakdown(expense, total_expense),
        transaction_count: transactions.len() as u64,
    }
}

/// Per year-month totals, oldest first, with averages over the months present.
pub fn monthly_trends(transactions: &[Transaction]) -> MonthlyTrends {
    let mut by_month: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let key = (tx.date.year(), tx.date.month());
        let entry = by_month.entry(key).or_default();
        match tx.transaction_type {
            TransactionType::Income => entry.0 += tx.amount.value(),
            TransactionType::Expense => entry.1 += tx.amount.value(),
        }
    }

    let months: Vec<MonthlyTotal> = by_month
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotal {
            year,
            month,
            income,
            expense,
            balance: income - expense,
        })
        .collect();

    let (average_income, average_expense) = if months.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(months.len() as u64);
        let income: Decimal = months.iter().map(|m| m.income).sum();
        let expense: Decimal = months.iter().map(|m| m.expense).sum();
        ((income / n).round_dp(2), (expense / n).round_dp(2))
    };

    MonthlyTrends {
        months,
        average_income,
        average_expense,
    }
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Amount, CategoryName};
    use crate::UserId;
    use chrono::{DateTime, TimeZone, Utc};

    struct Fixture {
        user: UserId,
        salary: Category,
        food: Category,
        transport: Category,
    }

    impl Fixture {
        fn new() -> Self {
            let now = Utc::now();
            Self {
                user: UserId::new(),
                salary: Category::shared(
                    CategoryName::new("Salary").unwrap(),
                    TransactionType::Income,
                    now,
                ),
                food: Category::shared(
                    CategoryName::new("Food").unwrap(),
                    TransactionType::Expense,
                    now,
                ),
                transport: Category::shared(
                    CategoryName::new("Transport").unwrap(),
                    TransactionType::Expense,
                    now,
                ),
            }
        }

        fn tx(&self, category: &Category, cents: i64, date: DateTime<Utc>) -> Transaction {
            Transaction::record(
                self.user,
                category,
                category.category_type,
                Amount::from_cents(cents).unwrap(),
                None,
                date,
                date,
            )
            .unwrap()
        }

        fn categories(&self) -> Vec<Category> {
            vec![self.salary.clone(), self.food.clone(), self.transport.clone()]
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn daily_buckets_keep_income_and_expense_apart() {
        let f = Fixture::new();
        let txs = vec![
            f.tx(&f.food, 1_000, at(2026, 3, 2, 9)),
            f.tx(&f.salary, 300_000, at(2026, 3, 1, 8)),
            f.tx(&f.transport, 250, at(2026, 3, 1, 18)),
            f.tx(&f.food, 1_550, at(2026, 3, 1, 20)),
        ];

        let buckets = daily_buckets(&txs);
        assert_eq!(
            buckets,
            vec![
                DailyBucket {
                    date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                    income: dec(300_000),
                    expense: dec(1_800),
                },
                DailyBucket {
                    date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                    income: Decimal::ZERO,
                    expense: dec(1_000),
                },
            ]
        );
    }

    #[test]
    fn summary_breaks_down_each_type() {
        let f = Fixture::new();
        let txs = vec![
            f.tx(&f.salary, 200_000, at(2026, 3, 1, 8)),
            f.tx(&f.food, 3_000, at(2026, 3, 2, 8)),
            f.tx(&f.food, 3_000, at(2026, 3, 3, 8)),
            f.tx(&f.transport, 4_000, at(2026, 3, 3, 9)),
        ];

        let summary = summarize(&txs, &f.categories());
        assert_eq!(summary.total_income, dec(200_000));
        assert_eq!(summary.total_expense, dec(10_000));
        assert_eq!(summary.balance, dec(190_000));
        assert_eq!(summary.transaction_count, 4);

        assert_eq!(summary.income_by_category.len(), 1);
        assert_eq!(summary.income_by_category[0].percentage, Decimal::ONE_HUNDRED);

        let food = &summary.expense_by_category[0];
        assert_eq!(food.name, "Food");
        assert_eq!(food.count, 2);
        assert_eq!(food.total, dec(6_000));
        assert_eq!(food.percentage, Decimal::new(60, 0));
        assert_eq!(summary.expense_by_category[1].percentage, Decimal::new(40, 0));
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.balance, Decimal::ZERO);
        assert!(summary.expense_by_category.is_empty());
        assert_eq!(summary.transaction_count, 0);
    }

    #[test]
    fn monthly_trends_average_over_present_months() {
        let f = Fixture::new();
        let txs = vec![
            f.tx(&f.salary, 100_000, at(2026, 1, 15, 8)),
            f.tx(&f.food, 20_000, at(2026, 1, 20, 8)),
            f.tx(&f.salary, 200_000, at(2026, 2, 15, 8)),
            f.tx(&f.food, 10_002, at(2026, 2, 20, 8)),
        ];

        let trends = monthly_trends(&txs);
        assert_eq!(trends.months.len(), 2);
        assert_eq!((trends.months[0].year, trends.months[0].month), (2026, 1));
        assert_eq!(trends.months[0].balance, dec(80_000));
        assert_eq!(trends.average_income, dec(150_000));
        assert_eq!(trends.average_expense, dec(15_001));
    }
}
