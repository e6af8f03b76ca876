//! Pennywise is a web service for tracking personal finances.
//!
//! Users record income and expense transactions, group them into categories,
//! save towards goals and define recurring monthly transactions. The library
//! exposes a JSON API over axum and keeps each user's records in SQLite.
//! Clients can subscribe to whole-collection snapshots via server-sent events.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auth;
mod calendar_date;
mod category;
mod database_id;
mod db;
mod endpoints;
mod events;
mod goal;
mod ledger;
mod logging;
mod recurring;
mod report;
mod routing;
mod timezone;
mod transaction;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword};
pub use category::{Category, CategoryKind};
pub use database_id::{CategoryId, DatabaseId, GoalId, TemplateId, TransactionId};
pub use db::initialize as initialize_db;
pub use goal::{Goal, GoalProgress};
pub use ledger::{Collection, Ledger, Record, Subscription};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use recurring::{ProcessReport, RecurringTemplate, process_recurring};
pub use report::{CategoryTotal, MonthComparison, MonthlyTotals, YearMonth};
pub use routing::build_router;
pub use transaction::{RecurringKey, Transaction, TransactionBuilder, TransactionType};
pub use validation::{Amount, DayOfMonth, Name};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be decoded or has expired.
    #[error("the auth cookie is invalid or has expired")]
    InvalidToken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already used by another account.
    #[error("an account with this email address already exists")]
    DuplicateEmail,

    /// A name field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    /// An amount of money was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The day of the month for a recurring transaction was outside 1 to 31.
    #[error("{0} is not a valid day of the month, expected a number from 1 to 31")]
    InvalidDayOfMonth(i64),

    /// The month number was outside 1 to 12.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(i64),

    /// The year was outside the range of supported calendar dates.
    #[error("{0} is not a supported year")]
    InvalidYear(i32),

    /// An expense transaction was linked to a savings goal.
    #[error("only income transactions can contribute to a goal")]
    GoalOnExpense,

    /// The category cannot be used for the transaction type.
    #[error("the category \"{0}\" cannot be used for this transaction type")]
    CategoryTypeMismatch(String),

    /// The category ID does not refer to one of the user's categories.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The goal ID does not refer to one of the user's goals.
    #[error("the goal ID {0} does not refer to a valid goal")]
    InvalidGoal(GoalId),

    /// A recurring template has already been materialized for the month.
    #[error("the recurring transaction has already been created for this month")]
    DuplicateRecurringKey,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a recurring template that does not exist
    #[error("tried to update a recurring transaction that is not in the database")]
    UpdateMissingTemplate,

    /// Tried to delete a recurring template that does not exist
    #[error("tried to delete a recurring transaction that is not in the database")]
    DeleteMissingTemplate,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("recurring_template_id") =>
            {
                Error::DuplicateRecurringKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::CookieMissing | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::EmptyName(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDayOfMonth(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::GoalOnExpense
            | Error::CategoryTypeMismatch(_)
            | Error::InvalidCategory(_)
            | Error::InvalidGoal(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail | Error::DuplicateRecurringKey => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingGoal
            | Error::DeleteMissingGoal
            | Error::UpdateMissingTemplate
            | Error::DeleteMissingTemplate => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn not_found_variants_map_to_404() {
        for error in [
            Error::NotFound,
            Error::DeleteMissingTransaction,
            Error::UpdateMissingGoal,
            Error::DeleteMissingTemplate,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(
            Error::GoalOnExpense.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidAmount(-1.0).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            Error::CookieMissing.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_errors_map_to_500() {
        assert_eq!(
            Error::DatabaseLockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
