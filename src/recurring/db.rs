//! Database operations for recurring templates.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    database_id::TemplateId,
    ledger::Record,
    recurring::{RecurringTemplate, TemplateFields},
    validation::Name,
};

const TEMPLATE_COLUMNS: &str = "id, name, amount, day_of_month, transaction_type, category_id";

impl Record for RecurringTemplate {
    type Id = TemplateId;
    type Fields = TemplateFields;

    fn insert(
        user_id: UserID,
        fields: TemplateFields,
        connection: &Connection,
    ) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "INSERT INTO recurring_template
                    (user_id, name, amount, day_of_month, transaction_type, category_id)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING {TEMPLATE_COLUMNS}"
            ))?
            .query_row(
                (
                    user_id.as_i64(),
                    fields.name.as_ref(),
                    fields.amount.as_f64(),
                    fields.day_of_month.get(),
                    fields.transaction_type,
                    fields.category_id,
                ),
                map_row,
            )
            .map_err(|error| error.into())
    }

    /// Update a template. Transactions already created from it are not changed.
    fn update(
        user_id: UserID,
        id: TemplateId,
        fields: TemplateFields,
        connection: &Connection,
    ) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "UPDATE recurring_template
                SET name = ?1, amount = ?2, day_of_month = ?3, transaction_type = ?4, category_id = ?5
                WHERE id = ?6 AND user_id = ?7
                RETURNING {TEMPLATE_COLUMNS}"
            ))?
            .query_row(
                (
                    fields.name.as_ref(),
                    fields.amount.as_f64(),
                    fields.day_of_month.get(),
                    fields.transaction_type,
                    fields.category_id,
                    id,
                    user_id.as_i64(),
                ),
                map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTemplate,
                error => error.into(),
            })
    }

    fn delete(user_id: UserID, id: TemplateId, connection: &Connection) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "DELETE FROM recurring_template WHERE id = ?1 AND user_id = ?2
                RETURNING {TEMPLATE_COLUMNS}"
            ))?
            .query_row((id, user_id.as_i64()), map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTemplate,
                error => error.into(),
            })
    }

    /// Retrieve the user's templates in the order they fall due in a month.
    fn select_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Self>, Error> {
        connection
            .prepare(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM recurring_template WHERE user_id = ?1
                ORDER BY day_of_month ASC, id ASC"
            ))?
            .query_map([user_id.as_i64()], map_row)?
            .map(|maybe_template| maybe_template.map_err(|error| error.into()))
            .collect()
    }
}

/// Initialize the recurring template table.
pub fn create_recurring_template_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS recurring_template (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            day_of_month INTEGER NOT NULL CHECK (day_of_month BETWEEN 1 AND 31),
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
            category_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recurring_template_user ON recurring_template(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<RecurringTemplate, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(RecurringTemplate {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        amount: row.get(2)?,
        day_of_month: row.get(3)?,
        transaction_type: row.get(4)?,
        category_id: row.get(5)?,
    })
}
