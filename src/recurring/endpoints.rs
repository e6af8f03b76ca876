//! JSON endpoints for recurring templates and for running the processor.

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error, UserID,
    database_id::TemplateId,
    ledger::Ledger,
    recurring::{ProcessReport, RecurringTemplate, TemplateForm, process_recurring},
    timezone::get_local_date,
};

/// The state needed to run the recurring processor.
#[derive(Clone)]
pub struct RecurringState {
    pub ledger: Ledger,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for RecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// List the user's recurring templates.
pub async fn get_templates_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<RecurringTemplate>>, Error> {
    ledger.recurring().list_by_user(user_id).map(Json)
}

/// Create a recurring template.
pub async fn create_template_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TemplateForm>,
) -> Result<(StatusCode, Json<RecurringTemplate>), Error> {
    let fields = form.validate(user_id, &*ledger.connection()?)?;

    let template = ledger
        .recurring()
        .add(user_id, fields)
        .inspect_err(|error| tracing::error!("Could not create recurring template: {error}"))?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// Edit a recurring template.
pub async fn update_template_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(template_id): Path<TemplateId>,
    Json(form): Json<TemplateForm>,
) -> Result<Json<RecurringTemplate>, Error> {
    let fields = form.validate(user_id, &*ledger.connection()?)?;

    ledger
        .recurring()
        .update(user_id, template_id, fields)
        .map(Json)
}

/// Delete a recurring template. Transactions created from it are kept.
pub async fn delete_template_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(template_id): Path<TemplateId>,
) -> Result<StatusCode, Error> {
    ledger.recurring().delete(user_id, template_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create this month's transactions for the user's due templates.
pub async fn process_recurring_endpoint(
    State(state): State<RecurringState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<ProcessReport>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    process_recurring(user_id, today, &state.ledger).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error, UserID,
        category::CategoryKind,
        recurring::{
            TemplateForm, create_template_endpoint, delete_template_endpoint,
            endpoints::RecurringState, get_templates_endpoint, process_recurring_endpoint, update_template_endpoint,
        },
        test_utils::{must_create_test_ledger, test_category_fields},
        transaction::TransactionType,
    };

    fn salary_form(category_id: i64) -> TemplateForm {
        TemplateForm {
            name: "Salary".to_owned(),
            amount: 3000.0,
            day_of_month: 1,
            transaction_type: TransactionType::Income,
            category_id,
        }
    }

    #[tokio::test]
    async fn create_update_list_delete() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let category = ledger
            .categories()
            .add(user_id, test_category_fields("Salary", CategoryKind::Income))
            .unwrap();

        let (status, Json(template)) = create_template_endpoint(
            State(ledger.clone()),
            Extension(user_id),
            Json(salary_form(category.id)),
        )
        .await
        .unwrap();
        let Json(updated) = update_template_endpoint(
            State(ledger.clone()),
            Extension(user_id),
            Path(template.id),
            Json(TemplateForm {
                amount: 3100.0,
                ..salary_form(category.id)
            }),
        )
        .await
        .unwrap();
        let Json(templates) = get_templates_endpoint(State(ledger.clone()), Extension(user_id))
            .await
            .unwrap();
        let deleted =
            delete_template_endpoint(State(ledger.clone()), Extension(user_id), Path(template.id))
                .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(updated.amount, 3100.0);
        assert_eq!(templates, vec![updated]);
        assert_eq!(deleted, Ok(StatusCode::NO_CONTENT));
        assert_eq!(ledger.recurring().list_by_user(user_id), Ok(vec![]));
    }

    #[tokio::test]
    async fn process_creates_templates_due_on_the_first() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let category = ledger
            .categories()
            .add(user_id, test_category_fields("Salary", CategoryKind::Income))
            .unwrap();
        create_template_endpoint(
            State(ledger.clone()),
            Extension(user_id),
            Json(salary_form(category.id)),
        )
        .await
        .unwrap();
        let state = RecurringState {
            ledger: ledger.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let Json(first) = process_recurring_endpoint(State(state.clone()), Extension(user_id))
            .await
            .unwrap();
        let Json(second) = process_recurring_endpoint(State(state), Extension(user_id))
            .await
            .unwrap();

        // Day 1 is due on every day of the month.
        assert_eq!(first.created.len(), 1);
        assert!(second.created.is_empty());
        assert_eq!(ledger.transactions().list_by_user(user_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn process_fails_with_invalid_timezone() {
        let state = RecurringState {
            ledger: must_create_test_ledger(),
            local_timezone: "Mars/Olympus_Mons".to_owned(),
        };

        let result = process_recurring_endpoint(State(state), Extension(UserID::new(1))).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
