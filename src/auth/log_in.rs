//! Handles log-in requests and the state shared by the endpoints that start a session.

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{UserProfile, get_user_by_email, set_auth_cookie},
    category::seed_default_categories,
    ledger::Ledger,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to register users and log them in.
#[derive(Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub ledger: Ledger,
    /// The bcrypt cost for hashing new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            ledger: state.ledger.clone(),
            password_hash_cost: state.password_hash_cost,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the hash in the database.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,
    /// Keep the session for one week instead of the default duration.
    #[serde(default)]
    pub remember_me: bool,
}

/// Give the user the default categories on their first session and tell
/// subscribers about them.
///
/// Failures are logged and do not stop the user from signing in.
pub(crate) fn complete_initial_setup(ledger: &Ledger, user_profile: &UserProfile) {
    let seeded = ledger
        .connection()
        .and_then(|connection| seed_default_categories(user_profile.id, &connection));

    match seeded {
        Ok(true) => ledger.categories().publish(user_profile.id),
        Ok(false) => {}
        Err(error) => tracing::error!(
            "Could not create the default categories for user {}: {error}",
            user_profile.id
        ),
    }
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set and the user's profile is returned.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the email is not registered or the
/// password is wrong.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<UserProfile>), Error> {
    let user = get_user_by_email(&user_data.email, &*state.ledger.connection()?).map_err(
        |error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        },
    )?;

    if !user.password_hash.verify(&user_data.password)? {
        tracing::warn!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let cookie_duration = if user_data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let profile = UserProfile::from(user);
    complete_initial_setup(&state.ledger, &profile);

    let jar = set_auth_cookie(jar, profile.id, cookie_duration)
        .inspect_err(|error| tracing::error!("Error setting auth cookie: {error}"))?;
    tracing::info!("User {} logged in", profile.id);

    Ok((jar, Json(profile)))
}
