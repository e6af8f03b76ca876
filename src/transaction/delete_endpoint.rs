use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{Error, UserID, database_id::TransactionId, ledger::Ledger};

/// A route handler for deleting a transaction, responds with 204 No Content.
///
/// Income linked to a goal is withdrawn from the goal's current amount, which
/// never drops below zero.
pub async fn delete_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    ledger
        .delete_transaction(user_id, transaction_id)
        .inspect_err(|error| {
            tracing::error!("Could not delete transaction {transaction_id}: {error}")
        })?;

    Ok(StatusCode::NO_CONTENT)
}
