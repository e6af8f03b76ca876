//! Core recurring transaction types.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    category::get_category,
    database_id::{CategoryId, TemplateId},
    transaction::TransactionType,
    validation::{Amount, DayOfMonth, Name},
};

/// A transaction that should be created once a month, e.g. rent or a salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: TemplateId,
    pub name: Name,
    pub amount: f64,
    /// The day of the month the transaction is due, from 1 to 31.
    pub day_of_month: u8,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: CategoryId,
}

/// The validated fields for creating or editing a recurring template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFields {
    pub name: Name,
    pub amount: Amount,
    pub day_of_month: DayOfMonth,
    pub transaction_type: TransactionType,
    pub category_id: CategoryId,
}

/// Form data for recurring template creation and editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateForm {
    pub name: String,
    pub amount: f64,
    pub day_of_month: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: CategoryId,
}

impl TemplateForm {
    /// Validate the form, checking the category against the user's categories.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyName], [Error::InvalidAmount] or [Error::InvalidDayOfMonth] for invalid fields,
    /// - [Error::InvalidCategory] if the category is not one of the user's categories,
    /// - [Error::CategoryTypeMismatch] if the category cannot be used for the transaction type,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn validate(self, user_id: UserID, connection: &Connection) -> Result<TemplateFields, Error> {
        let name = Name::new(&self.name, "recurring transaction name")?;
        let amount = Amount::new(self.amount)?;
        let day_of_month = DayOfMonth::new(self.day_of_month)?;

        let category =
            get_category(user_id, self.category_id, connection).map_err(|error| match error {
                Error::NotFound => Error::InvalidCategory(self.category_id),
                error => error,
            })?;

        if !category.kind.accepts(self.transaction_type) {
            return Err(Error::CategoryTypeMismatch(category.name.to_string()));
        }

        Ok(TemplateFields {
            name,
            amount,
            day_of_month,
            transaction_type: self.transaction_type,
            category_id: self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, UserID,
        category::CategoryKind,
        recurring::TemplateForm,
        test_utils::{must_create_test_ledger, test_category_fields},
        transaction::TransactionType,
    };

    fn form(day_of_month: i64, category_id: i64) -> TemplateForm {
        TemplateForm {
            name: "Rent".to_owned(),
            amount: 1200.0,
            day_of_month,
            transaction_type: TransactionType::Expense,
            category_id,
        }
    }

    #[test]
    fn validates_day_of_month() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let category = ledger
            .categories()
            .add(user_id, test_category_fields("Housing", CategoryKind::Expense))
            .unwrap();
        let connection = ledger.connection().unwrap();

        assert_eq!(
            form(32, category.id).validate(user_id, &connection),
            Err(Error::InvalidDayOfMonth(32))
        );
        assert_eq!(
            form(5, category.id)
                .validate(user_id, &connection)
                .map(|fields| fields.day_of_month.get()),
            Ok(5)
        );
    }

    #[test]
    fn rejects_income_category_for_expense() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let category = ledger
            .categories()
            .add(user_id, test_category_fields("Salary", CategoryKind::Income))
            .unwrap();

        let result = form(5, category.id).validate(user_id, &ledger.connection().unwrap());

        assert_eq!(result, Err(Error::CategoryTypeMismatch("Salary".to_owned())));
    }

    #[test]
    fn rejects_unknown_category() {
        let ledger = must_create_test_ledger();

        let result = form(5, 404).validate(UserID::new(1), &ledger.connection().unwrap());

        assert_eq!(result, Err(Error::InvalidCategory(404)));
    }
}
