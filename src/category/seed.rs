//! Default categories for new users.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    category::{CategoryFields, CategoryKind, count_categories, create_category},
    validation::Name,
};

/// The categories every new user starts with: (name, color, kind).
const DEFAULT_CATEGORIES: [(&str, &str, CategoryKind); 6] = [
    ("Education", "#3b82f6", CategoryKind::Expense),
    ("Transport", "#f59e0b", CategoryKind::Expense),
    ("Food", "#f59e0b", CategoryKind::Expense),
    ("Salary", "#10b981", CategoryKind::Income),
    ("Freelance", "#06b6d4", CategoryKind::Income),
    ("Leisure", "#8b5cf6", CategoryKind::Expense),
];

/// Give the user the default categories the first time this is called for them.
///
/// Nothing is inserted if the user's setup marker is already set or the user
/// already has categories. Either way the marker is set afterwards, in the
/// same SQL transaction as the inserts.
///
/// Returns whether the default categories were inserted.
///
/// # Errors
/// Returns an [Error::NotFound] if `user_id` does not refer to a registered user,
/// or an [Error::SqlError] if there is some other SQL error.
pub fn seed_default_categories(user_id: UserID, connection: &Connection) -> Result<bool, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let setup_completed: bool = sql_transaction.query_row(
        "SELECT initial_setup_completed FROM user WHERE id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    if setup_completed {
        return Ok(false);
    }

    let should_seed = count_categories(user_id, &sql_transaction)? == 0;

    if should_seed {
        for (name, color, kind) in DEFAULT_CATEGORIES {
            create_category(
                user_id,
                CategoryFields {
                    name: Name::new_unchecked(name),
                    color: color.to_owned(),
                    kind,
                },
                &sql_transaction,
            )?;
        }
    }

    sql_transaction.execute(
        "UPDATE user SET initial_setup_completed = 1 WHERE id = ?1",
        [user_id.as_i64()],
    )?;
    sql_transaction.commit()?;

    if should_seed {
        tracing::info!("Created the default categories for user {user_id}");
    }

    Ok(should_seed)
}
