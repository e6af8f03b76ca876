use serde::Serialize;
use time::Date;

use crate::goal::Goal;

/// How far along a goal is, in quarter steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// Less than 25%.
    Beginning,
    /// At least 25%.
    Started,
    /// At least 50%.
    Halfway,
    /// At least 75%.
    Almost,
    /// The target has been reached.
    Completed,
}

impl ProgressStatus {
    fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            ProgressStatus::Completed
        } else if percent >= 75.0 {
            ProgressStatus::Almost
        } else if percent >= 50.0 {
            ProgressStatus::Halfway
        } else if percent >= 25.0 {
            ProgressStatus::Started
        } else {
            ProgressStatus::Beginning
        }
    }
}

/// The number of days before a deadline at which it counts as near.
const DEADLINE_NEAR_DAYS: i64 = 30;

/// Display information about a goal's progress on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// The current amount as a percentage of the target, may exceed 100.
    pub percent: f64,
    pub status: ProgressStatus,
    /// How much is left to save, never negative.
    pub remaining: f64,
    /// Days until the deadline, negative once it has passed.
    pub days_remaining: Option<i64>,
    /// The deadline is within the next 30 days.
    pub deadline_near: bool,
    /// The deadline has passed.
    pub overdue: bool,
}

impl GoalProgress {
    /// Compute the progress of `goal` as of `today`.
    pub fn new(goal: &Goal, today: Date) -> Self {
        let percent = if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            0.0
        };
        let days_remaining = goal
            .deadline
            .map(|deadline| (deadline - today).whole_days());

        Self {
            percent,
            status: ProgressStatus::from_percent(percent),
            remaining: (goal.target_amount - goal.current_amount).max(0.0),
            days_remaining,
            deadline_near: days_remaining
                .is_some_and(|days| days > 0 && days <= DEADLINE_NEAR_DAYS),
            overdue: days_remaining.is_some_and(|days| days < 0),
        }
    }
}
