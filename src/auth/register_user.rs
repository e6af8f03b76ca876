//! Registers a new user and starts their first session.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{LoginState, PasswordHash, UserProfile, complete_initial_setup, create_user, set_auth_cookie},
    validation::Name,
};

/// The data entered by the user in the registration form.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Create a user, give them the default categories and log them in.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidEmail] if the email address is malformed,
/// - [Error::EmptyName] if the display name is blank,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateEmail] if the email address is already registered.
pub async fn register_user(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, PrivateCookieJar, Json<UserProfile>), Error> {
    let email = EmailAddress::from_str(form.email.trim())
        .map_err(|_| Error::InvalidEmail(form.email.clone()))?;
    let display_name = Name::new(&form.display_name, "display name")?;
    let password_hash = PasswordHash::from_raw_password(&form.password, state.password_hash_cost)?;

    let user = create_user(
        &email,
        &display_name,
        password_hash,
        &*state.ledger.connection()?,
    )
    .inspect_err(|error| match error {
        Error::DuplicateEmail => {}
        error => tracing::error!("Could not create user: {error}"),
    })?;

    let profile = UserProfile::from(user);
    tracing::info!("Registered user {}", profile.id);
    complete_initial_setup(&state.ledger, &profile);

    let jar = set_auth_cookie(jar, profile.id, state.cookie_duration)?;

    Ok((StatusCode::CREATED, jar, Json(profile)))
}

#[cfg(test)]
mod register_user_tests {
    use axum::{Json, extract::State, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;

    use crate::{
        Error,
        auth::{LoginState, get_token_from_cookies, register_user, register_user::RegisterForm},
        test_utils::must_create_test_state,
    };

    const STRONG_PASSWORD: &str = "w0rdplay-Tangerine-Gravel-93";

    fn registration_state() -> LoginState {
        let state = must_create_test_state();

        LoginState {
            cookie_key: state.cookie_key,
            cookie_duration: state.cookie_duration,
            ledger: state.ledger,
            password_hash_cost: state.password_hash_cost,
        }
    }

    fn form(email: &str, display_name: &str, password: &str) -> Json<RegisterForm> {
        Json(RegisterForm {
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            password: password.to_owned(),
        })
    }

    #[tokio::test]
    async fn register_creates_user_with_default_categories() {
        let state = registration_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let (status, jar, Json(profile)) = register_user(
            State(state.clone()),
            jar,
            form("ada@example.com", "Ada", STRONG_PASSWORD),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(get_token_from_cookies(&jar).unwrap().user_id, profile.id);

        let categories = state.ledger.categories().list_by_user(profile.id).unwrap();
        let mut names: Vec<String> = categories
            .iter()
            .map(|category| category.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["Education", "Food", "Freelance", "Leisure", "Salary", "Transport"]
        );
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let state = registration_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let result = register_user(State(state), jar, form("not-an-email", "Ada", STRONG_PASSWORD))
            .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidEmail("not-an-email".to_owned()))
        );
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let state = registration_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let result = register_user(State(state), jar, form("ada@example.com", "Ada", "password"))
            .await;

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let state = registration_state();
        register_user(
            State(state.clone()),
            PrivateCookieJar::new(state.cookie_key.clone()),
            form("ada@example.com", "Ada", STRONG_PASSWORD),
        )
        .await
        .unwrap();

        let result = register_user(
            State(state.clone()),
            PrivateCookieJar::new(state.cookie_key.clone()),
            form("ADA@example.com", "Ada again", STRONG_PASSWORD),
        )
        .await;

        assert_eq!(result.err(), Some(Error::DuplicateEmail));
    }
}
