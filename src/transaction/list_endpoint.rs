//! The endpoint for listing a user's transactions.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error, UserID,
    database_id::CategoryId,
    ledger::Ledger,
    report::YearMonth,
    transaction::{
        Transaction, TransactionType,
        query::{SortBy, TransactionFilter, filter_transactions},
    },
};

/// The query parameters for filtering the transaction list.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Text to search for in the description.
    pub search: Option<String>,
    /// Only list transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only list income or only list expenses.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only list transactions in this year, requires `month`.
    pub year: Option<i32>,
    /// Only list transactions in this month, requires `year`.
    pub month: Option<i64>,
    /// The order to list transactions in, newest first by default.
    #[serde(default)]
    pub sort: SortBy,
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        let month = match (query.year, query.month) {
            (Some(year), Some(month)) => Some(YearMonth::new(year, month)?),
            _ => None,
        };

        Ok(TransactionFilter {
            search: query.search,
            category_id: query.category_id,
            transaction_type: query.transaction_type,
            month,
            sort: query.sort,
        })
    }
}

/// A route handler for listing the user's transactions.
pub async fn get_transactions_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter::try_from(query)?;
    let transactions = ledger.transactions().list_by_user(user_id)?;

    Ok(Json(filter_transactions(transactions, &filter)))
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json,
        extract::{Query, State},
    };
    use time::macros::date;

    use crate::{
        Error, UserID,
        test_utils::must_create_test_ledger,
        transaction::{
            Transaction, TransactionType, get_transactions_endpoint,
            list_endpoint::TransactionQuery,
        },
        validation::Amount,
    };

    #[tokio::test]
    async fn lists_only_the_users_transactions() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        for (user, description) in [(user_id, "Mine"), (UserID::new(2), "Theirs")] {
            ledger
                .add_transaction(
                    user,
                    Transaction::build(
                        TransactionType::Expense,
                        Amount::new(5.0).unwrap(),
                        date!(2025 - 01 - 01),
                        description,
                        1,
                    ),
                )
                .unwrap();
        }

        let Json(transactions) = get_transactions_endpoint(
            State(ledger),
            Extension(user_id),
            Query(TransactionQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Mine");
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let ledger = must_create_test_ledger();
        let query = TransactionQuery {
            year: Some(2025),
            month: Some(13),
            ..Default::default()
        };

        let result =
            get_transactions_endpoint(State(ledger), Extension(UserID::new(1)), Query(query)).await;

        assert_eq!(result.err(), Some(Error::InvalidMonth(13)));
    }
}
