use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error, UserID,
    database_id::TransactionId,
    ledger::Ledger,
    transaction::{Transaction, form::TransactionForm, get_transaction},
};

/// A route handler for editing a transaction, responds with the updated transaction.
///
/// The old contribution is withdrawn from the old goal and the new contribution
/// added to the new goal in the same database transaction. A category or goal
/// that was deleted after the transaction was saved may be kept as it is.
pub async fn edit_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let builder = {
        let connection = ledger.connection()?;
        let current =
            get_transaction(user_id, transaction_id, &connection).map_err(|error| match error {
                Error::NotFound => Error::UpdateMissingTransaction,
                error => error,
            })?;

        form.validate_edit(user_id, &current, &connection)?
    };

    ledger
        .update_transaction(user_id, transaction_id, builder)
        .inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}")
        })
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json,
        extract::{Path, State},
    };
    use time::macros::date;

    use crate::{
        Error, UserID,
        category::CategoryKind,
        ledger::Ledger,
        test_utils::{must_create_test_ledger, test_category_fields, test_goal_fields},
        transaction::{Transaction, TransactionType, edit_transaction_endpoint, form::TransactionForm},
        validation::Amount,
    };

    struct Fixture {
        ledger: Ledger,
        user_id: UserID,
        category_id: i64,
        first_goal_id: i64,
        second_goal_id: i64,
        transaction_id: i64,
    }

    fn fixture() -> Fixture {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let category_id = ledger
            .categories()
            .add(user_id, test_category_fields("Salary", CategoryKind::Income))
            .unwrap()
            .id;
        let first_goal_id = ledger.goals().add(user_id, test_goal_fields("Car", 5000.0)).unwrap().id;
        let second_goal_id =
            ledger.goals().add(user_id, test_goal_fields("House", 50000.0)).unwrap().id;
        let transaction_id = ledger
            .add_transaction(
                user_id,
                Transaction::build(
                    TransactionType::Income,
                    Amount::new(300.0).unwrap(),
                    date!(2025 - 04 - 01),
                    "Bonus",
                    category_id,
                )
                .goal_id(Some(first_goal_id)),
            )
            .unwrap()
            .id;

        Fixture {
            ledger,
            user_id,
            category_id,
            first_goal_id,
            second_goal_id,
            transaction_id,
        }
    }

    fn goal_amount(ledger: &Ledger, user_id: UserID, goal_id: i64) -> f64 {
        ledger
            .goals()
            .list_by_user(user_id)
            .unwrap()
            .into_iter()
            .find(|goal| goal.id == goal_id)
            .unwrap()
            .current_amount
    }

    #[tokio::test]
    async fn moving_income_between_goals_moves_the_amount() {
        let fixture = fixture();
        let form = TransactionForm {
            transaction_type: TransactionType::Income,
            amount: 200.0,
            description: "Bonus".to_owned(),
            category_id: fixture.category_id,
            date: date!(2025 - 04 - 01),
            paid: true,
            goal_id: Some(fixture.second_goal_id),
        };

        let Json(updated) = edit_transaction_endpoint(
            State(fixture.ledger.clone()),
            Extension(fixture.user_id),
            Path(fixture.transaction_id),
            Json(form),
        )
        .await
        .unwrap();

        assert_eq!(updated.amount, 200.0);
        assert_eq!(goal_amount(&fixture.ledger, fixture.user_id, fixture.first_goal_id), 0.0);
        assert_eq!(goal_amount(&fixture.ledger, fixture.user_id, fixture.second_goal_id), 200.0);
    }

    #[tokio::test]
    async fn unlinking_goal_withdraws_contribution() {
        let fixture = fixture();
        let form = TransactionForm {
            transaction_type: TransactionType::Income,
            amount: 300.0,
            description: "Bonus".to_owned(),
            category_id: fixture.category_id,
            date: date!(2025 - 04 - 01),
            paid: true,
            goal_id: None,
        };

        edit_transaction_endpoint(
            State(fixture.ledger.clone()),
            Extension(fixture.user_id),
            Path(fixture.transaction_id),
            Json(form),
        )
        .await
        .unwrap();

        assert_eq!(goal_amount(&fixture.ledger, fixture.user_id, fixture.first_goal_id), 0.0);
    }

    #[tokio::test]
    async fn editing_another_users_transaction_fails() {
        let fixture = fixture();
        let bob = UserID::new(2);
        let bobs_category = fixture
            .ledger
            .categories()
            .add(bob, test_category_fields("Salary", CategoryKind::Income))
            .unwrap();
        let form = TransactionForm {
            transaction_type: TransactionType::Income,
            amount: 1.0,
            description: "Mine now".to_owned(),
            category_id: bobs_category.id,
            date: date!(2025 - 04 - 01),
            paid: true,
            goal_id: None,
        };

        let result = edit_transaction_endpoint(
            State(fixture.ledger.clone()),
            Extension(bob),
            Path(fixture.transaction_id),
            Json(form),
        )
        .await;

        assert_eq!(result.err(), Some(Error::UpdateMissingTransaction));
        assert_eq!(goal_amount(&fixture.ledger, fixture.user_id, fixture.first_goal_id), 300.0);
    }

    #[tokio::test]
    async fn edit_keeps_references_to_deleted_category_and_goal() {
        let fixture = fixture();
        fixture
            .ledger
            .goals()
            .delete(fixture.user_id, fixture.first_goal_id)
            .unwrap();
        fixture
            .ledger
            .categories()
            .delete(fixture.user_id, fixture.category_id)
            .unwrap();
        let form = TransactionForm {
            transaction_type: TransactionType::Income,
            amount: 450.0,
            description: "Bonus".to_owned(),
            category_id: fixture.category_id,
            date: date!(2025 - 04 - 01),
            paid: false,
            goal_id: Some(fixture.first_goal_id),
        };

        let Json(updated) = edit_transaction_endpoint(
            State(fixture.ledger.clone()),
            Extension(fixture.user_id),
            Path(fixture.transaction_id),
            Json(form),
        )
        .await
        .unwrap();

        assert_eq!(updated.amount, 450.0);
        assert!(!updated.paid);
        assert_eq!(updated.category_id, fixture.category_id);
        assert_eq!(updated.goal_id, Some(fixture.first_goal_id));
    }
}
