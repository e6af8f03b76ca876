//! Helpers for setting up databases, users and records in tests.

#![allow(missing_docs)]

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    AppState, CategoryId,
    auth::{PasswordHash, User, ValidatedPassword, create_user},
    category::{CategoryFields, CategoryKind, NEUTRAL_COLOR},
    db::initialize,
    goal::GoalFields,
    ledger::Ledger,
    recurring::TemplateFields,
    transaction::TransactionType,
    validation::{Amount, DayOfMonth, Name},
};

pub(crate) const TEST_EMAIL: &str = "test@example.com";
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";
pub(crate) const TEST_SECRET: &str = "nafstenoas";
pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";

/// An in-memory database with every table created.
pub(crate) fn must_create_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&conn).expect("Could not initialize database.");

    conn
}

pub(crate) fn must_create_test_ledger() -> Ledger {
    Ledger::new(Arc::new(Mutex::new(must_create_test_connection())))
}

/// App state over an in-memory database that hashes passwords with the cheapest bcrypt cost.
pub(crate) fn must_create_test_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");
    let mut state =
        AppState::new(conn, TEST_SECRET, TEST_TIMEZONE).expect("Could not create app state.");
    state.password_hash_cost = PasswordHash::MIN_COST;

    state
}

/// Insert the user [TEST_EMAIL] with the password [TEST_PASSWORD].
pub(crate) fn must_create_test_user(conn: &Connection) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::MIN_COST,
    )
    .expect("Could not hash test password.");

    create_user(
        &EmailAddress::from_str(TEST_EMAIL).unwrap(),
        &Name::new_unchecked("Test User"),
        password_hash,
        conn,
    )
    .expect("Could not create test user.")
}

pub(crate) fn test_category_fields(name: &str, kind: CategoryKind) -> CategoryFields {
    CategoryFields {
        name: Name::new_unchecked(name),
        color: NEUTRAL_COLOR.to_owned(),
        kind,
    }
}

pub(crate) fn test_goal_fields(name: &str, target_amount: f64) -> GoalFields {
    GoalFields {
        name: Name::new_unchecked(name),
        target_amount: Amount::new(target_amount).unwrap(),
        deadline: None,
        description: None,
    }
}

pub(crate) fn test_template_fields(
    name: &str,
    amount: f64,
    day_of_month: u8,
    transaction_type: TransactionType,
    category_id: CategoryId,
) -> TemplateFields {
    TemplateFields {
        name: Name::new_unchecked(name),
        amount: Amount::new(amount).unwrap(),
        day_of_month: DayOfMonth::new(day_of_month.into()).unwrap(),
        transaction_type,
        category_id,
    }
}
