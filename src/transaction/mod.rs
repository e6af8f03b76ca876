//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and querying transactions
//! - Filtering and sorting for the transaction list
//! - The JSON endpoints for creating, editing, deleting and listing transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;
mod query;

pub use core::{
    RecurringKey, Transaction, TransactionBuilder, TransactionType, create_transaction_table,
    get_transaction, recurring_key_exists,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::TransactionForm;
pub use list_endpoint::get_transactions_endpoint;
pub use query::{SortBy, TransactionFilter, filter_transactions};
