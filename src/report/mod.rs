//! Reports for the dashboard: monthly totals, month-over-month comparisons and
//! per-category breakdowns.

mod aggregation;
mod endpoints;
mod month;

pub use aggregation::{
    CategoryTotal, MonthComparison, MonthlyTotals, TypeFilter, category_breakdown,
    month_comparison, monthly_totals, transactions_in_month,
};
pub use endpoints::{
    get_category_report_endpoint, get_history_report_endpoint, get_month_report_endpoint,
};
pub use month::YearMonth;
