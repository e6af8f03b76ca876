//! Keeps each goal's current amount in line with the income linked to it.
//!
//! The functions that take a transaction are called by the transaction store
//! inside the same SQL transaction as the write they reconcile.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    database_id::GoalId,
    goal::{Goal, set_goal_amount},
    transaction::{Transaction, TransactionType},
};

/// Add `amount` to the goal's current amount.
///
/// A goal that no longer exists is skipped.
fn add_to_goal(
    user_id: UserID,
    goal_id: GoalId,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = current_amount + ?1 WHERE id = ?2 AND user_id = ?3",
        (amount, goal_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        tracing::warn!("Skipped adding {amount} to goal {goal_id}: the goal does not exist");
    }

    Ok(())
}

/// Subtract `amount` from the goal's current amount, stopping at zero.
///
/// A goal that no longer exists is skipped.
fn subtract_from_goal(
    user_id: UserID,
    goal_id: GoalId,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = MAX(0.0, current_amount - ?1)
        WHERE id = ?2 AND user_id = ?3",
        (amount, goal_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        tracing::warn!("Skipped subtracting {amount} from goal {goal_id}: the goal does not exist");
    }

    Ok(())
}

/// Apply a newly created transaction's contribution to its goal.
pub fn reconcile_created(
    user_id: UserID,
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    match transaction.goal_contribution() {
        Some((goal_id, amount)) => add_to_goal(user_id, goal_id, amount, connection),
        None => Ok(()),
    }
}

/// Withdraw a deleted transaction's contribution from its goal.
pub fn reconcile_deleted(
    user_id: UserID,
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    match transaction.goal_contribution() {
        Some((goal_id, amount)) => subtract_from_goal(user_id, goal_id, amount, connection),
        None => Ok(()),
    }
}

/// Reverse the old version's contribution, then apply the new version's.
///
/// The two steps may target different goals, or only one of them may apply.
pub fn reconcile_edited(
    user_id: UserID,
    old: &Transaction,
    new: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    reconcile_deleted(user_id, old, connection)?;
    reconcile_created(user_id, new, connection)
}

/// Recompute the goal's current amount from scratch as the sum of the income
/// linked to it, and store it.
///
/// # Errors
/// Returns an [Error::UpdateMissingGoal] if the goal does not exist.
pub fn recalculate_goal(
    user_id: UserID,
    goal_id: GoalId,
    connection: &Connection,
) -> Result<Goal, Error> {
    let total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
        WHERE user_id = ?1 AND goal_id = ?2 AND transaction_type = ?3",
        (user_id.as_i64(), goal_id, TransactionType::Income),
        |row| row.get(0),
    )?;

    set_goal_amount(user_id, goal_id, total, connection)
}
