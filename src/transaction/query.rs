//! Filtering and sorting for the transaction list.

use serde::Deserialize;

use crate::{
    database_id::CategoryId,
    report::YearMonth,
    transaction::{Transaction, TransactionType},
};

/// The order to list transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first.
    #[default]
    Date,
    /// Largest amount first.
    Amount,
    /// Alphabetical by description, ignoring case.
    Description,
}

/// Which transactions to keep in the list and how to order them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Keep transactions whose description contains this text, ignoring case.
    pub search: Option<String>,
    /// Keep transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Keep transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Keep transactions dated in this month.
    pub month: Option<YearMonth>,
    /// The order of the result.
    pub sort: SortBy,
}

/// Apply `filter` to `transactions`.
///
/// Sorting is stable, so transactions that compare equal keep their input order.
pub fn filter_transactions(
    transactions: Vec<Transaction>,
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
        .map(str::to_lowercase);

    let mut transactions: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| {
            search
                .as_deref()
                .is_none_or(|search| transaction.description.to_lowercase().contains(search))
        })
        .filter(|transaction| {
            filter
                .category_id
                .is_none_or(|category_id| transaction.category_id == category_id)
        })
        .filter(|transaction| {
            filter
                .transaction_type
                .is_none_or(|transaction_type| transaction.transaction_type == transaction_type)
        })
        .filter(|transaction| {
            filter
                .month
                .is_none_or(|month| month.contains(transaction.date))
        })
        .collect();

    match filter.sort {
        SortBy::Date => transactions.sort_by(|a, b| b.date.cmp(&a.date)),
        SortBy::Amount => transactions.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortBy::Description => transactions.sort_by(|a, b| {
            a.description
                .to_lowercase()
                .cmp(&b.description.to_lowercase())
        }),
    }

    transactions
}
