//! Recurring monthly transactions, e.g. rent and salaries.

mod db;
mod domain;
mod endpoints;
mod processor;

pub use db::create_recurring_template_table;
pub use domain::{RecurringTemplate, TemplateFields, TemplateForm};
pub use endpoints::{
    create_template_endpoint, delete_template_endpoint, get_templates_endpoint,
    process_recurring_endpoint, update_template_endpoint,
};
pub use processor::{ProcessReport, process_recurring};
