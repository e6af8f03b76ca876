//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    Error, UserID,
    ledger::Ledger,
    transaction::{Transaction, form::TransactionForm},
};

/// A route handler for creating a new transaction, responds with the created transaction.
///
/// Income linked to a goal is added to the goal's current amount in the same
/// database transaction.
pub async fn create_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let builder = form.validate(user_id, &*ledger.connection()?)?;

    let transaction = ledger
        .add_transaction(user_id, builder)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
