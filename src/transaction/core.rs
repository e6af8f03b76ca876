//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    database_id::{CategoryId, GoalId, TemplateId, TransactionId},
    goal::{reconcile_created, reconcile_deleted, reconcile_edited},
    ledger::Record,
    validation::Amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// Identifies the month a recurring template was materialized for.
///
/// At most one transaction per user may carry a given key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurringKey {
    /// The template the transaction was created from.
    pub template_id: TemplateId,
    /// The calendar year of the materialized month.
    pub year: i32,
    /// The materialized month, from 1 to 12.
    pub month: u8,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction happened.
    #[serde(with = "crate::calendar_date")]
    pub date: Date,
    /// Whether the transaction has been settled.
    pub paid: bool,
    /// The savings goal an income contributes to.
    pub goal_id: Option<GoalId>,
    /// Set when the transaction was created from a recurring template.
    pub recurring: Option<RecurringKey>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: Amount,
        date: Date,
        description: &str,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            date,
            description: description.to_owned(),
            category_id,
            paid: true,
            goal_id: None,
            recurring: None,
        }
    }

    /// The goal and amount this transaction adds to that goal's current amount.
    ///
    /// Only income linked to a goal contributes.
    pub fn goal_contribution(&self) -> Option<(GoalId, f64)> {
        match (self.transaction_type, self.goal_id) {
            (TransactionType::Income, Some(goal_id)) => Some((goal_id, self.amount)),
            _ => None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// New transactions are marked as paid and have no goal unless set otherwise.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{transaction::{Transaction, TransactionType}, validation::Amount};
///
/// let builder = Transaction::build(
///         TransactionType::Income,
///         Amount::new(500.0).unwrap(),
///         date!(2025-01-15),
///         "Bonus",
///         salary_category_id,
///     )
///     .goal_id(Some(holiday_goal_id));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The validated, positive amount of the transaction.
    pub amount: Amount,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category of the transaction, e.g. "Food", "Salary".
    pub category_id: CategoryId,
    /// Whether the transaction has been settled.
    pub paid: bool,
    /// The savings goal an income contributes to.
    pub goal_id: Option<GoalId>,
    /// The materialization key for transactions created from a recurring template.
    ///
    /// Ignored when updating a transaction.
    pub recurring: Option<RecurringKey>,
}

impl TransactionBuilder {
    /// Set whether the transaction has been settled.
    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Set the goal the transaction contributes to.
    pub fn goal_id(mut self, goal_id: Option<GoalId>) -> Self {
        self.goal_id = goal_id;
        self
    }

    /// Mark the transaction as created from a recurring template.
    pub fn recurring(mut self, key: RecurringKey) -> Self {
        self.recurring = Some(key);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, transaction_type, amount, description, category_id, date, \
    paid, goal_id, recurring_template_id, recurring_year, recurring_month";

impl Record for Transaction {
    type Id = TransactionId;
    type Fields = TransactionBuilder;

    /// Insert the transaction and add its contribution to the linked goal, atomically.
    fn insert(
        user_id: UserID,
        builder: TransactionBuilder,
        connection: &Connection,
    ) -> Result<Self, Error> {
        let sql_transaction = connection.unchecked_transaction()?;
        let transaction = insert_transaction(user_id, builder, &sql_transaction)?;
        reconcile_created(user_id, &transaction, &sql_transaction)?;
        sql_transaction.commit()?;

        Ok(transaction)
    }

    /// Update the transaction and move its contribution between goals, atomically.
    fn update(
        user_id: UserID,
        id: TransactionId,
        builder: TransactionBuilder,
        connection: &Connection,
    ) -> Result<Self, Error> {
        let sql_transaction = connection.unchecked_transaction()?;
        let old = get_transaction(user_id, id, &sql_transaction).map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingTransaction,
            error => error,
        })?;

        let new = sql_transaction
            .prepare(&format!(
                "UPDATE \"transaction\" SET \
                    transaction_type = ?1, \
                    amount = ?2, \
                    description = ?3, \
                    category_id = ?4, \
                    date = ?5, \
                    paid = ?6, \
                    goal_id = ?7 \
                WHERE id = ?8 AND user_id = ?9 \
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    builder.transaction_type,
                    builder.amount.as_f64(),
                    builder.description,
                    builder.category_id,
                    builder.date,
                    builder.paid,
                    builder.goal_id,
                    id,
                    user_id.as_i64(),
                ),
                map_transaction_row,
            )?;

        reconcile_edited(user_id, &old, &new, &sql_transaction)?;
        sql_transaction.commit()?;

        Ok(new)
    }

    /// Delete the transaction and withdraw its contribution from the linked goal, atomically.
    fn delete(user_id: UserID, id: TransactionId, connection: &Connection) -> Result<Self, Error> {
        let sql_transaction = connection.unchecked_transaction()?;
        let deleted = sql_transaction
            .prepare(&format!(
                "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2 \
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row((id, user_id.as_i64()), map_transaction_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTransaction,
                error => error.into(),
            })?;

        reconcile_deleted(user_id, &deleted, &sql_transaction)?;
        sql_transaction.commit()?;

        Ok(deleted)
    }

    /// Select the user's transactions, newest first.
    fn select_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Self>, Error> {
        connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = ?1 \
                ORDER BY date DESC, id DESC"
            ))?
            .query_map([user_id.as_i64()], map_transaction_row)?
            .map(|transaction_result| transaction_result.map_err(Error::SqlError))
            .collect()
    }
}

/// Insert a transaction row without touching any goal.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateRecurringKey] if a transaction with the same recurring key already exists,
/// - or [Error::SqlError] if there is some other SQL error.
fn insert_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let recurring = builder.recurring;

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, transaction_type, amount, description, \
                category_id, date, paid, goal_id, recurring_template_id, recurring_year, \
                recurring_month)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                user_id.as_i64(),
                builder.transaction_type,
                builder.amount.as_f64(),
                builder.description,
                builder.category_id,
                builder.date,
                builder.paid,
                builder.goal_id,
                recurring.map(|key| key.template_id),
                recurring.map(|key| key.year),
                recurring.map(|key| key.month),
            ],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Whether the user already has a transaction with the recurring `key`.
///
/// # Errors
/// Returns a [Error::SqlError] if there is an SQL error.
pub fn recurring_key_exists(
    user_id: UserID,
    key: RecurringKey,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM \"transaction\"
                WHERE user_id = ?1 AND recurring_template_id = ?2
                    AND recurring_year = ?3 AND recurring_month = ?4
            )",
            (user_id.as_i64(), key.template_id, key.year, key.month),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                paid INTEGER NOT NULL,
                goal_id INTEGER,
                recurring_template_id INTEGER,
                recurring_year INTEGER,
                recurring_month INTEGER
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    // At most one materialized transaction per template and month.
    connection.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_transaction_recurring_key ON \"transaction\"
            (user_id, recurring_template_id, recurring_year, recurring_month);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must have the columns in the order of `TRANSACTION_COLUMNS`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let recurring_template_id: Option<TemplateId> = row.get(8)?;
    let recurring_year: Option<i32> = row.get(9)?;
    let recurring_month: Option<u8> = row.get(10)?;

    let recurring = match (recurring_template_id, recurring_year, recurring_month) {
        (Some(template_id), Some(year), Some(month)) => Some(RecurringKey {
            template_id,
            year,
            month,
        }),
        _ => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        date: row.get(5)?,
        paid: row.get(6)?,
        goal_id: row.get(7)?,
        recurring,
    })
}

// ============================================================================
// TESTS
// ============================================================================
