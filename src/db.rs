//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, category::create_category_table, goal::create_goal_table,
    recurring::create_recurring_template_table, transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not exist yet.
///
/// The tables are created in a single exclusive transaction, so a partially
/// initialized database is never left behind.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_recurring_template_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
