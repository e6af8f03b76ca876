//! JSON endpoints for the monthly and per-category reports.

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, UserID,
    ledger::Ledger,
    report::{
        CategoryTotal, MonthComparison, MonthlyTotals, TypeFilter, YearMonth, category_breakdown,
        month_comparison, monthly_totals, transactions_in_month,
    },
    timezone::get_local_date,
};

/// The state needed for the report endpoints.
#[derive(Clone)]
pub struct ReportState {
    pub ledger: Ledger,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The month to report on. Missing fields default to the current local month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<i64>,
}

impl MonthQuery {
    fn resolve(&self, local_timezone: &str) -> Result<YearMonth, Error> {
        if let (Some(year), Some(month)) = (self.year, self.month) {
            return YearMonth::new(year, month);
        }

        let today = YearMonth::from_date(get_local_date(local_timezone)?);
        YearMonth::new(
            self.year.unwrap_or(today.year),
            self.month.unwrap_or(i64::from(today.month)),
        )
    }
}

/// The query for the category breakdown.
#[derive(Debug, Default, Deserialize)]
pub struct BreakdownQuery {
    pub year: Option<i32>,
    pub month: Option<i64>,
    #[serde(rename = "type", default)]
    pub type_filter: TypeFilter,
}

/// The category breakdown of a month.
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub month: YearMonth,
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    pub categories: Vec<CategoryTotal>,
}

/// The totals of the selected month compared with the month before it.
pub async fn get_month_report_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthComparison>, Error> {
    let month = query.resolve(&state.local_timezone)?;
    let transactions = state.ledger.transactions().list_by_user(user_id)?;

    Ok(Json(month_comparison(&transactions, month)))
}

/// The per-category totals of the selected month.
pub async fn get_category_report_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<BreakdownQuery>,
) -> Result<Json<BreakdownResponse>, Error> {
    let month = MonthQuery {
        year: query.year,
        month: query.month,
    }
    .resolve(&state.local_timezone)?;
    let transactions = state.ledger.transactions().list_by_user(user_id)?;
    let categories = state.ledger.categories().list_by_user(user_id)?;

    let selected = transactions_in_month(&transactions, month, query.type_filter);

    Ok(Json(BreakdownResponse {
        month,
        type_filter: query.type_filter,
        categories: category_breakdown(&selected, &categories),
    }))
}

/// The totals of every month with transactions, oldest first.
pub async fn get_history_report_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<MonthlyTotals>>, Error> {
    let transactions = ledger.transactions().list_by_user(user_id)?;

    Ok(Json(monthly_totals(&transactions)))
}
