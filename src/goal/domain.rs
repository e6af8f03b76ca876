//! Core savings goal domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::GoalId, validation::{Amount, Name}};

/// An amount of money the user is saving towards.
///
/// `current_amount` is maintained by the goal reconciler from the income
/// transactions linked to the goal and is never set by user edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: Name,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default, with = "crate::calendar_date::option")]
    pub deadline: Option<Date>,
    pub description: Option<String>,
}

/// The user-editable fields of a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalFields {
    pub name: Name,
    pub target_amount: Amount,
    pub deadline: Option<Date>,
    pub description: Option<String>,
}

/// Form data for goal creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: f64,
    #[serde(default, with = "crate::calendar_date::option")]
    pub deadline: Option<Date>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<GoalForm> for GoalFields {
    type Error = Error;

    fn try_from(form: GoalForm) -> Result<Self, Self::Error> {
        let description = form
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        Ok(GoalFields {
            name: Name::new(&form.name, "goal name")?,
            target_amount: Amount::new(form.target_amount)?,
            deadline: form.deadline,
            description,
        })
    }
}
