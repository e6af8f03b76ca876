//! Database operations for savings goals.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    database_id::GoalId,
    goal::{Goal, GoalFields},
    ledger::Record,
    validation::Name,
};

const GOAL_COLUMNS: &str = "id, name, target_amount, current_amount, deadline, description";

impl Record for Goal {
    type Id = GoalId;
    type Fields = GoalFields;

    /// Insert a goal with a current amount of zero.
    fn insert(user_id: UserID, fields: GoalFields, connection: &Connection) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "INSERT INTO goal (user_id, name, target_amount, current_amount, deadline, description)
                VALUES (?1, ?2, ?3, 0, ?4, ?5)
                RETURNING {GOAL_COLUMNS}"
            ))?
            .query_row(
                (
                    user_id.as_i64(),
                    fields.name.as_ref(),
                    fields.target_amount.as_f64(),
                    fields.deadline,
                    fields.description,
                ),
                map_row,
            )
            .map_err(|error| error.into())
    }

    /// Update the user-editable fields, leaving the current amount untouched.
    fn update(
        user_id: UserID,
        id: GoalId,
        fields: GoalFields,
        connection: &Connection,
    ) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "UPDATE goal SET name = ?1, target_amount = ?2, deadline = ?3, description = ?4
                WHERE id = ?5 AND user_id = ?6
                RETURNING {GOAL_COLUMNS}"
            ))?
            .query_row(
                (
                    fields.name.as_ref(),
                    fields.target_amount.as_f64(),
                    fields.deadline,
                    fields.description,
                    id,
                    user_id.as_i64(),
                ),
                map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingGoal,
                error => error.into(),
            })
    }

    /// Delete a goal. Linked transactions keep the dangling goal ID.
    fn delete(user_id: UserID, id: GoalId, connection: &Connection) -> Result<Self, Error> {
        connection
            .prepare(&format!(
                "DELETE FROM goal WHERE id = ?1 AND user_id = ?2 RETURNING {GOAL_COLUMNS}"
            ))?
            .query_row((id, user_id.as_i64()), map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingGoal,
                error => error.into(),
            })
    }

    fn select_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Self>, Error> {
        connection
            .prepare(&format!(
                "SELECT {GOAL_COLUMNS} FROM goal WHERE user_id = ?1 ORDER BY id ASC"
            ))?
            .query_map([user_id.as_i64()], map_row)?
            .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
            .collect()
    }
}

/// Retrieve one of the user's goals by ID.
pub fn get_goal(user_id: UserID, goal_id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((goal_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Overwrite a goal's current amount, clamped to zero.
///
/// # Errors
/// Returns an [Error::UpdateMissingGoal] if the goal does not exist or belongs to another user.
pub fn set_goal_amount(
    user_id: UserID,
    goal_id: GoalId,
    amount: f64,
    connection: &Connection,
) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "UPDATE goal SET current_amount = MAX(0.0, ?1) WHERE id = ?2 AND user_id = ?3
            RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row((amount, goal_id, user_id.as_i64()), map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingGoal,
            error => error.into(),
        })
}

/// Initialize the goal table.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            deadline TEXT,
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_goal_user ON goal(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Goal {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        deadline: row.get(4)?,
        description: row.get(5)?,
    })
}
