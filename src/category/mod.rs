//! Categories for grouping transactions by what the money was for.

mod db;
mod domain;
mod endpoints;
mod seed;

pub use db::{count_categories, create_category, create_category_table, get_category};
pub use domain::{Category, CategoryFields, CategoryForm, CategoryKind, NEUTRAL_COLOR};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    update_category_endpoint,
};
pub use seed::seed_default_categories;
