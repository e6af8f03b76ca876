//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash, validation::Name};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address, stored in lowercase.
    pub email: String,
    /// The name shown in the app.
    pub display_name: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the user has been given the default categories.
    pub initial_setup_completed: bool,
}

/// The public view of a user, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserID,
    pub email: String,
    pub display_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                password TEXT NOT NULL,
                initial_setup_completed INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

const USER_COLUMNS: &str = "id, email, display_name, password, initial_setup_completed";

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns an [Error::DuplicateEmail] if the email is already registered or an
/// [Error::SqlError] if some other SQL error occurred.
pub fn create_user(
    email: &EmailAddress,
    display_name: &Name,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO user (email, display_name, password) VALUES (?1, ?2, ?3)
            RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                email.as_str().to_lowercase(),
                display_name.as_ref(),
                password_hash.as_ref(),
            ),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Get the user with the ID `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`. The comparison ignores case and
/// surrounding whitespace.
///
/// # Errors
///
/// Returns an [Error::NotFound] if no user is registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email.trim().to_lowercase())], map_user_row)
        .map_err(|error| error.into())
}

/// Change the user's display name.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_display_name(
    user_id: UserID,
    display_name: &Name,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET display_name = ?1 WHERE id = ?2 RETURNING {USER_COLUMNS}"
        ))?
        .query_row((display_name.as_ref(), user_id.as_i64()), map_user_row)
        .map_err(|error| error.into())
}

/// Delete the user row. The user's records must be deleted separately.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", [user_id.as_i64()])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: row.get(1)?,
        display_name: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        initial_setup_completed: row.get(4)?,
    })
}
