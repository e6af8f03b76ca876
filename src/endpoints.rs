//! The API endpoints URIs.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to register a new user.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for getting the signed-in user.
pub const SESSION: &str = "/api/session";
/// The route for deleting the signed-in user's account.
pub const ACCOUNT: &str = "/api/account";
/// The route for changing the signed-in user's display name.
pub const DISPLAY_NAME: &str = "/api/account/display_name";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to edit or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to edit or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create savings goals.
pub const GOALS: &str = "/api/goals";
/// The route to edit or delete a single savings goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to recompute a goal's current amount from its linked transactions.
pub const RECONCILE_GOAL: &str = "/api/goals/{goal_id}/reconcile";
/// The route to list and create recurring templates.
pub const RECURRING: &str = "/api/recurring";
/// The route to edit or delete a single recurring template.
pub const RECURRING_TEMPLATE: &str = "/api/recurring/{template_id}";
/// The route to create this month's recurring transactions.
pub const PROCESS_RECURRING: &str = "/api/recurring/process";

/// The route for the month totals compared with the previous month.
pub const MONTH_REPORT: &str = "/api/reports/month";
/// The route for the per-category totals of a month.
pub const CATEGORY_REPORT: &str = "/api/reports/categories";
/// The route for the totals of every month.
pub const HISTORY_REPORT: &str = "/api/reports/history";

/// The route for the server-sent event stream of collection snapshots.
pub const EVENTS: &str = "/api/events";
