//! The request body for creating and editing transactions.

use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error, UserID,
    category::get_category,
    database_id::{CategoryId, GoalId},
    goal::get_goal,
    transaction::{Transaction, TransactionBuilder, TransactionType},
    validation::Amount,
};

fn default_paid() -> bool {
    true
}

/// The data for creating or editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The value of the transaction, must be greater than zero.
    pub amount: f64,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
    /// The date when the transaction ocurred.
    #[serde(with = "crate::calendar_date")]
    pub date: Date,
    /// Whether the transaction has been settled, defaults to `true`.
    #[serde(default = "default_paid")]
    pub paid: bool,
    /// The savings goal an income contributes to.
    #[serde(default)]
    pub goal_id: Option<GoalId>,
}

impl TransactionForm {
    /// Check the form against the user's categories and goals.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is not greater than zero,
    /// - [Error::InvalidCategory] if the category is not one of the user's categories,
    /// - [Error::CategoryTypeMismatch] if the category cannot be used for the transaction type,
    /// - [Error::GoalOnExpense] if an expense is linked to a goal,
    /// - [Error::InvalidGoal] if the goal is not one of the user's goals,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn validate(
        self,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<TransactionBuilder, Error> {
        self.check(user_id, None, connection)
    }

    /// Check the form for an edit of `current`.
    ///
    /// A category or goal that has been deleted since `current` was saved is
    /// accepted as long as the form keeps it unchanged. Changed references
    /// are checked as in [TransactionForm::validate].
    ///
    /// # Errors
    /// Returns the same errors as [TransactionForm::validate].
    pub fn validate_edit(
        self,
        user_id: UserID,
        current: &Transaction,
        connection: &Connection,
    ) -> Result<TransactionBuilder, Error> {
        self.check(user_id, Some(current), connection)
    }

    fn check(
        self,
        user_id: UserID,
        current: Option<&Transaction>,
        connection: &Connection,
    ) -> Result<TransactionBuilder, Error> {
        let amount = Amount::new(self.amount)?;
        let keeps_category = current.is_some_and(|current| current.category_id == self.category_id);

        match get_category(user_id, self.category_id, connection) {
            Ok(category) => {
                if !category.kind.accepts(self.transaction_type) {
                    return Err(Error::CategoryTypeMismatch(category.name.to_string()));
                }
            }
            Err(Error::NotFound) if keeps_category => {
                tracing::debug!("Kept missing category {} on edit", self.category_id);
            }
            Err(Error::NotFound) => return Err(Error::InvalidCategory(self.category_id)),
            Err(error) => return Err(error),
        }

        if let Some(goal_id) = self.goal_id {
            if self.transaction_type == TransactionType::Expense {
                return Err(Error::GoalOnExpense);
            }

            let keeps_goal = current.is_some_and(|current| current.goal_id == Some(goal_id));

            match get_goal(user_id, goal_id, connection) {
                Ok(_) => {}
                Err(Error::NotFound) if keeps_goal => {
                    tracing::debug!("Kept missing goal {goal_id} on edit");
                }
                Err(Error::NotFound) => return Err(Error::InvalidGoal(goal_id)),
                Err(error) => return Err(error),
            }
        }

        Ok(Transaction::build(
            self.transaction_type,
            amount,
            self.date,
            self.description.trim(),
            self.category_id,
        )
        .paid(self.paid)
        .goal_id(self.goal_id))
    }
}
