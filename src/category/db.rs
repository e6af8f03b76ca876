//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    category::{Category, CategoryFields},
    database_id::CategoryId,
    ledger::Record,
    validation::Name,
};

impl Record for Category {
    type Id = CategoryId;
    type Fields = CategoryFields;

    fn insert(user_id: UserID, fields: CategoryFields, connection: &Connection) -> Result<Self, Error> {
        create_category(user_id, fields, connection)
    }

    fn update(
        user_id: UserID,
        id: CategoryId,
        fields: CategoryFields,
        connection: &Connection,
    ) -> Result<Self, Error> {
        connection
            .prepare(
                "UPDATE category SET name = ?1, color = ?2, kind = ?3
                WHERE id = ?4 AND user_id = ?5
                RETURNING id, name, color, kind",
            )?
            .query_row(
                (fields.name.as_ref(), fields.color, fields.kind, id, user_id.as_i64()),
                map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingCategory,
                error => error.into(),
            })
    }

    /// Delete a category. Transactions and templates that reference it keep the dangling ID.
    fn delete(user_id: UserID, id: CategoryId, connection: &Connection) -> Result<Self, Error> {
        connection
            .prepare(
                "DELETE FROM category WHERE id = ?1 AND user_id = ?2
                RETURNING id, name, color, kind",
            )?
            .query_row((id, user_id.as_i64()), map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingCategory,
                error => error.into(),
            })
    }

    /// Retrieve the user's categories ordered alphabetically by name.
    fn select_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Self>, Error> {
        connection
            .prepare(
                "SELECT id, name, color, kind FROM category WHERE user_id = ?1
                ORDER BY name COLLATE NOCASE ASC, id ASC;",
            )?
            .query_map([user_id.as_i64()], map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

/// Create a category and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    fields: CategoryFields,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, color, kind) VALUES (?1, ?2, ?3, ?4);",
        (user_id.as_i64(), fields.name.as_ref(), &fields.color, fields.kind),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: fields.name,
        color: fields.color,
        kind: fields.kind,
    })
}

/// Retrieve one of the user's categories by ID.
pub fn get_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, kind FROM category WHERE id = ?1 AND user_id = ?2;")?
        .query_row((category_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Count the user's categories.
pub fn count_categories(user_id: UserID, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM category WHERE user_id = ?1;",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense', 'both'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = Name::new_unchecked(&raw_name);
    let color = row.get(2)?;
    let kind = row.get(3)?;

    Ok(Category {
        id,
        name,
        color,
        kind,
    })
}
