//! JSON endpoints for listing, creating, editing and deleting categories.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error, UserID,
    category::{Category, CategoryFields, CategoryForm},
    database_id::CategoryId,
    ledger::Ledger,
};

/// List the user's categories alphabetically.
pub async fn get_categories_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    ledger.categories().list_by_user(user_id).map(Json)
}

/// Create a category, responds with the new category.
pub async fn create_category_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let fields = CategoryFields::try_from(form)?;

    let category = ledger
        .categories()
        .add(user_id, fields)
        .inspect_err(|error| tracing::error!("Could not create category: {error}"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category's name, color and kind.
pub async fn update_category_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let fields = CategoryFields::try_from(form)?;

    ledger
        .categories()
        .update(user_id, category_id, fields)
        .inspect_err(|error| match error {
            Error::UpdateMissingCategory => {}
            error => tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            ),
        })
        .map(Json)
}

/// Delete a category.
///
/// Transactions and recurring templates filed under the category keep its ID
/// and are reported under "Category not found".
pub async fn delete_category_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    ledger.categories().delete(user_id, category_id)?;

    Ok(StatusCode::NO_CONTENT)
}
