//! User accounts, sessions and the auth middleware.

mod account;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;

pub use account::{delete_account_endpoint, get_session_endpoint, update_display_name_endpoint};
pub(crate) use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie,
    set_auth_cookie,
};
pub(crate) use log_in::complete_initial_setup;
pub use log_in::{LoginState, post_log_in};
pub use log_out::post_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::register_user;
pub(crate) use token::Token;
pub use user::{
    User, UserID, UserProfile, create_user, create_user_table, delete_user, get_user_by_email,
    get_user_by_id, update_display_name,
};
