//! Endpoints for the signed-in user's own account.

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{
        UserID, UserProfile, delete_user, get_user_by_id, invalidate_auth_cookie,
        update_display_name,
    },
    ledger::{Ledger, purge_user_records},
    validation::Name,
};

/// Get the signed-in user's profile.
///
/// A valid cookie for a user that has since been deleted is treated as an invalid session.
pub async fn get_session_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserProfile>, Error> {
    match get_user_by_id(user_id, &*ledger.connection()?) {
        Ok(user) => Ok(Json(user.into())),
        Err(Error::NotFound) => Err(Error::InvalidToken),
        Err(error) => Err(error),
    }
}

/// The new display name for the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayNameForm {
    pub display_name: String,
}

/// Change the signed-in user's display name.
pub async fn update_display_name_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<DisplayNameForm>,
) -> Result<Json<UserProfile>, Error> {
    let display_name = Name::new(&form.display_name, "display name")?;

    update_display_name(user_id, &display_name, &*ledger.connection()?)
        .map(|user| Json(user.into()))
}

/// The password confirming an account deletion.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeleteAccountForm {
    pub password: String,
}

/// Delete the signed-in user's account and every record they own.
///
/// The user must enter their password again. The records and the user are
/// deleted in one SQL transaction, so either everything is deleted or nothing is.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the password is wrong.
pub async fn delete_account_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Json(form): Json<DeleteAccountForm>,
) -> Result<(StatusCode, PrivateCookieJar), Error> {
    let user = get_user_by_id(user_id, &*ledger.connection()?)?;

    // Checked without holding the database lock.
    if !user.password_hash.verify(&form.password)? {
        tracing::warn!("Wrong password when deleting the account of user {user_id}");
        return Err(Error::InvalidCredentials);
    }

    {
        let connection = ledger.connection()?;
        let sql_transaction = connection.unchecked_transaction()?;
        purge_user_records(user_id, &sql_transaction)?;
        delete_user(user_id, &sql_transaction)?;
        sql_transaction
            .commit()
            .inspect_err(|error| tracing::error!("Could not delete user {user_id}: {error}"))?;
    }

    tracing::info!("Deleted user {user_id} and their records");
    // Open subscriptions receive empty collections.
    ledger.publish_all(user_id);

    Ok((StatusCode::NO_CONTENT, invalidate_auth_cookie(jar)))
}
