//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    auth::{
        auth_guard, delete_account_endpoint, get_session_endpoint, post_log_in, post_log_out,
        register_user, update_display_name_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    events::events_endpoint,
    goal::{
        create_goal_endpoint, delete_goal_endpoint, get_goals_endpoint, reconcile_goal_endpoint,
        update_goal_endpoint,
    },
    recurring::{
        create_template_endpoint, delete_template_endpoint, get_templates_endpoint,
        process_recurring_endpoint, update_template_endpoint,
    },
    report::{
        get_category_report_endpoint, get_history_report_endpoint, get_month_report_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::SESSION, get(get_session_endpoint))
        .route(endpoints::ACCOUNT, delete(delete_account_endpoint))
        .route(endpoints::DISPLAY_NAME, put(update_display_name_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(get_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            put(update_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::RECONCILE_GOAL, post(reconcile_goal_endpoint))
        .route(
            endpoints::RECURRING,
            get(get_templates_endpoint).post(create_template_endpoint),
        )
        .route(
            endpoints::PROCESS_RECURRING,
            post(process_recurring_endpoint),
        )
        .route(
            endpoints::RECURRING_TEMPLATE,
            put(update_template_endpoint).delete(delete_template_endpoint),
        )
        .route(endpoints::MONTH_REPORT, get(get_month_report_endpoint))
        .route(endpoints::CATEGORY_REPORT, get(get_category_report_endpoint))
        .route(endpoints::HISTORY_REPORT, get(get_history_report_endpoint))
        .route(endpoints::EVENTS, get(events_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
