//! Materializes each recurring template at most once per calendar month.

use serde::Serialize;
use time::Date;

use crate::{
    Error, UserID,
    database_id::TemplateId,
    ledger::Ledger,
    recurring::RecurringTemplate,
    transaction::{RecurringKey, Transaction, recurring_key_exists},
    validation::{Amount, Name},
};

/// The prefix of the description of transactions created from a template.
pub const RECURRING_DESCRIPTION_PREFIX: &str = "[Recurring] ";

/// The description given to transactions created from the template `name`.
pub fn recurring_description(name: &Name) -> String {
    format!("{RECURRING_DESCRIPTION_PREFIX}{name}")
}

/// What happened to each template in one run of [process_recurring].
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    /// The transactions created in this run.
    pub created: Vec<Transaction>,
    /// Templates due later this month.
    pub not_due: Vec<TemplateId>,
    /// Templates that already have a transaction this month.
    pub already_materialized: Vec<TemplateId>,
    /// Templates that could not be materialized, see the server logs.
    pub failed: Vec<TemplateId>,
}

/// Create this month's transaction for every template of the user that is due
/// by `today` and has not been materialized this month.
///
/// `today` should be the current date in the user's local timezone. A template
/// due on day `n` is materialized on the `n`th of the month of `today`.
/// Running this again in the same month creates nothing new.
///
/// Each template is handled on its own: a failure is logged and reported in
/// [ProcessReport::failed] and does not undo or stop the others.
///
/// # Errors
/// Returns an error only if the user's templates cannot be listed.
pub fn process_recurring(
    user_id: UserID,
    today: Date,
    ledger: &Ledger,
) -> Result<ProcessReport, Error> {
    let templates = ledger.recurring().list_by_user(user_id)?;
    let mut report = ProcessReport::default();

    for template in templates {
        if template.day_of_month > today.day() {
            report.not_due.push(template.id);
            continue;
        }

        match materialize(user_id, &template, today, ledger) {
            Ok(Some(transaction)) => report.created.push(transaction),
            Ok(None) => report.already_materialized.push(template.id),
            Err(error) => {
                tracing::error!(
                    "Could not create the recurring transaction for template {} of user {user_id}: {error}",
                    template.id
                );
                report.failed.push(template.id);
            }
        }
    }

    if !report.created.is_empty() {
        tracing::info!(
            "Created {} recurring transaction(s) for user {user_id}",
            report.created.len()
        );
    }

    Ok(report)
}

/// Create the template's transaction for the month of `today`.
///
/// Returns `None` if the template has already been materialized this month.
fn materialize(
    user_id: UserID,
    template: &RecurringTemplate,
    today: Date,
    ledger: &Ledger,
) -> Result<Option<Transaction>, Error> {
    let key = RecurringKey {
        template_id: template.id,
        year: today.year(),
        month: u8::from(today.month()),
    };

    let exists = recurring_key_exists(user_id, key, &*ledger.connection()?)?;
    if exists {
        return Ok(None);
    }

    let date = today
        .replace_day(template.day_of_month)
        .map_err(|_| Error::InvalidDayOfMonth(template.day_of_month.into()))?;
    let builder = Transaction::build(
        template.transaction_type,
        Amount::new(template.amount)?,
        date,
        &recurring_description(&template.name),
        template.category_id,
    )
    .paid(true)
    .recurring(key);

    match ledger.add_transaction(user_id, builder) {
        Ok(transaction) => Ok(Some(transaction)),
        // Another run created it between the check and the insert.
        Err(Error::DuplicateRecurringKey) => Ok(None),
        Err(error) => Err(error),
    }
}
