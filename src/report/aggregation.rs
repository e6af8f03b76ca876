//! Monthly totals and category breakdowns derived from a user's transactions.
//!
//! These functions are pure: they take the transaction list as loaded from
//! the ledger and never touch the database.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    category::{Category, NEUTRAL_COLOR},
    database_id::CategoryId,
    report::YearMonth,
    transaction::{Transaction, TransactionType},
};

/// The label shown for transactions whose category no longer exists.
pub const MISSING_CATEGORY_LABEL: &str = "Category not found";

/// Income and expense totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: f64,
    pub expense: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl MonthlyTotals {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        match transaction.transaction_type {
            TransactionType::Income => self.income += transaction.amount,
            TransactionType::Expense => self.expense += transaction.amount,
        }

        self.balance = self.income - self.expense;
    }
}

/// The totals of a month next to those of the month before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthComparison {
    pub current: MonthlyTotals,
    pub previous: MonthlyTotals,
    /// The current balance minus the previous balance.
    pub balance_difference: f64,
}

/// The summed amount of one category's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub color: String,
    pub total: f64,
    /// The percentage of the breakdown's grand total, from 0 to 100.
    pub share: f64,
}

/// Which transactions a category breakdown includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    Income,
    #[default]
    Expense,
    All,
}

impl TypeFilter {
    fn includes(&self, transaction_type: TransactionType) -> bool {
        matches!(
            (self, transaction_type),
            (TypeFilter::All, _)
                | (TypeFilter::Income, TransactionType::Income)
                | (TypeFilter::Expense, TransactionType::Expense)
        )
    }
}

/// Sum income and expenses per calendar month.
///
/// # Returns
/// One entry per month that has at least one transaction, in chronological order.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut totals: BTreeMap<YearMonth, MonthlyTotals> = BTreeMap::new();

    for transaction in transactions {
        let month = YearMonth::from_date(transaction.date);
        totals
            .entry(month)
            .or_insert_with(|| MonthlyTotals::empty(month))
            .add(transaction);
    }

    totals.into_values().collect()
}

/// Sum income and expenses for the transactions dated in `month`.
pub fn month_summary(transactions: &[Transaction], month: YearMonth) -> MonthlyTotals {
    transactions
        .iter()
        .filter(|transaction| month.contains(transaction.date))
        .fold(MonthlyTotals::empty(month), |mut totals, transaction| {
            totals.add(transaction);
            totals
        })
}

/// Compare the totals of `month` with the totals of the month before it.
pub fn month_comparison(transactions: &[Transaction], month: YearMonth) -> MonthComparison {
    let current = month_summary(transactions, month);
    let previous = month_summary(transactions, month.previous());

    MonthComparison {
        current,
        previous,
        balance_difference: current.balance - previous.balance,
    }
}

/// Sum the transactions per category.
///
/// The result is sorted by total, largest first. Categories with equal totals
/// keep the order in which they first appear in `transactions`. Category IDs
/// that are not in `categories` are labelled [MISSING_CATEGORY_LABEL].
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let mut order: Vec<CategoryId> = Vec::new();
    let mut sums: HashMap<CategoryId, f64> = HashMap::new();

    for transaction in transactions {
        let sum = sums.entry(transaction.category_id).or_insert_with(|| {
            order.push(transaction.category_id);
            0.0
        });
        *sum += transaction.amount;
    }

    let grand_total: f64 = sums.values().sum();
    let categories_by_id: HashMap<CategoryId, &Category> = categories
        .iter()
        .map(|category| (category.id, category))
        .collect();

    let mut breakdown: Vec<CategoryTotal> = order
        .into_iter()
        .map(|category_id| {
            let total = sums.get(&category_id).copied().unwrap_or_default();
            let (name, color) = match categories_by_id.get(&category_id) {
                Some(category) => (category.name.to_string(), category.color.clone()),
                None => (MISSING_CATEGORY_LABEL.to_owned(), NEUTRAL_COLOR.to_owned()),
            };
            let share = if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            };

            CategoryTotal {
                category_id,
                name,
                color,
                total,
                share,
            }
        })
        .collect();

    // `sort_by` is stable, so ties keep their first-encountered order.
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));

    breakdown
}

/// Select the transactions of `month` that match `filter`.
pub fn transactions_in_month(
    transactions: &[Transaction],
    month: YearMonth,
    filter: TypeFilter,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| {
            month.contains(transaction.date) && filter.includes(transaction.transaction_type)
        })
        .cloned()
        .collect()
}
