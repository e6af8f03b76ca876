//! JSON endpoints for savings goals.

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    AppState, Error, UserID,
    database_id::GoalId,
    goal::{Goal, GoalFields, GoalForm, GoalProgress, recalculate_goal},
    ledger::Ledger,
    timezone::get_local_date,
};

/// The state needed for the goal endpoints.
#[derive(Clone)]
pub struct GoalState {
    pub ledger: Ledger,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A goal together with its progress as of today.
#[derive(Debug, Serialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

/// List the user's goals with their progress.
pub async fn get_goals_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<GoalWithProgress>>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let goals = state
        .ledger
        .goals()
        .list_by_user(user_id)?
        .into_iter()
        .map(|goal| GoalWithProgress {
            progress: GoalProgress::new(&goal, today),
            goal,
        })
        .collect();

    Ok(Json(goals))
}

/// Create a goal with a current amount of zero.
pub async fn create_goal_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<GoalForm>,
) -> Result<(StatusCode, Json<Goal>), Error> {
    let fields = GoalFields::try_from(form)?;

    let goal = ledger
        .goals()
        .add(user_id, fields)
        .inspect_err(|error| tracing::error!("Could not create goal: {error}"))?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// Edit a goal's name, target, deadline and description.
pub async fn update_goal_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Json(form): Json<GoalForm>,
) -> Result<Json<Goal>, Error> {
    let fields = GoalFields::try_from(form)?;

    ledger.goals().update(user_id, goal_id, fields).map(Json)
}

/// Delete a goal. Linked transactions are left as they are.
pub async fn delete_goal_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    ledger.goals().delete(user_id, goal_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Recompute a goal's current amount from its linked income.
pub async fn reconcile_goal_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<Goal>, Error> {
    let goal = recalculate_goal(user_id, goal_id, &*ledger.connection()?)?;
    ledger.goals().publish(user_id);

    tracing::info!(
        "Recalculated goal {goal_id} for user {user_id}: {}",
        goal.current_amount
    );

    Ok(Json(goal))
}
