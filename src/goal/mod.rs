//! Savings goals and the reconciliation of their current amounts.

mod db;
mod domain;
mod endpoints;
mod progress;
mod reconcile;

pub use db::{create_goal_table, get_goal, set_goal_amount};
pub use domain::{Goal, GoalFields, GoalForm};
pub use endpoints::{
    create_goal_endpoint, delete_goal_endpoint, get_goals_endpoint, reconcile_goal_endpoint,
    update_goal_endpoint,
};
pub use progress::GoalProgress;
pub use reconcile::{reconcile_created, reconcile_deleted, reconcile_edited, recalculate_goal};
