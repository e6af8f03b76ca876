//! Core category domain types.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{database_id::CategoryId, transaction::TransactionType, validation::Name};

/// The color used for categories that have no color or no longer exist.
pub const NEUTRAL_COLOR: &str = "#64748b";

/// The transaction types a category can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Only income, e.g. "Salary".
    Income,
    /// Only expenses, e.g. "Food".
    Expense,
    /// Either income or expenses.
    Both,
}

impl CategoryKind {
    /// Whether a transaction of `transaction_type` may use a category of this kind.
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        matches!(
            (self, transaction_type),
            (CategoryKind::Both, _)
                | (CategoryKind::Income, TransactionType::Income)
                | (CategoryKind::Expense, TransactionType::Expense)
        )
    }

    fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
            CategoryKind::Both => "both",
        }
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            "both" => Ok(CategoryKind::Both),
            other => Err(FromSqlError::Other(
                format!("invalid category kind \"{other}\"").into(),
            )),
        }
    }
}

/// A category for grouping transactions (e.g., 'Food', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: Name,
    /// A display color, e.g. "#3b82f6".
    pub color: String,
    pub kind: CategoryKind,
}

/// The validated fields for creating or editing a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: Name,
    pub color: String,
    pub kind: CategoryKind,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub kind: CategoryKind,
}

impl TryFrom<CategoryForm> for CategoryFields {
    type Error = crate::Error;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        let color = form
            .color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .unwrap_or(NEUTRAL_COLOR)
            .to_owned();

        Ok(CategoryFields {
            name: Name::new(&form.name, "category name")?,
            color,
            kind: form.kind,
        })
    }
}
