//! Item routes.
//!
//! Create, edit, delete and bulk delete items of the caller's tenant, plus
//! the list and detail reads used by the item tables.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::items::{ItemFilter, ItemInput, ItemService, ItemSortColumn, ItemType, SortOrder};
use tally_db::{AccountRepository, ItemCategoryRepository, ItemRepository};
use tally_shared::types::{AccountId, ItemCategoryId, ItemId, PageRequest};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::error::{error_response, validation_response};
use crate::routes::parse_id_list;
use crate::{AppState, middleware::AuthUser};

type DbItemService = ItemService<ItemRepository, ItemCategoryRepository, AccountRepository>;

/// Creates the item routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(list_items).post(create_item).delete(bulk_delete_items),
        )
        .route(
            "/items/{item_id}",
            get(get_item).post(edit_item).delete(delete_item),
        )
}

fn item_service(state: &AppState) -> DbItemService {
    let db = (*state.db).clone();
    ItemService::new(
        Arc::new(ItemRepository::new(db.clone())),
        Arc::new(ItemCategoryRepository::new(db.clone())),
        Arc::new(AccountRepository::new(db)),
    )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating or editing an item.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
    /// Item type.
    #[serde(default)]
    pub item_type: ItemType,
    /// Stock keeping unit.
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    /// Category.
    pub category_id: Option<ItemCategoryId>,
    /// Selling price.
    #[validate(custom(function = "non_negative"))]
    pub sell_price: Option<Decimal>,
    /// Purchase cost.
    #[validate(custom(function = "non_negative"))]
    pub cost_price: Option<Decimal>,
    /// Income account used when the item is sold.
    pub sell_account_id: Option<AccountId>,
    /// Cost of goods sold account.
    pub cost_account_id: Option<AccountId>,
    /// Inventory asset account.
    pub inventory_account_id: Option<AccountId>,
    /// Free-form note.
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    /// Active flag, defaults to true.
    pub active: Option<bool>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

impl From<ItemRequest> for ItemInput {
    fn from(req: ItemRequest) -> Self {
        Self {
            name: req.name,
            item_type: req.item_type,
            sku: req.sku,
            category_id: req.category_id,
            sell_price: req.sell_price,
            cost_price: req.cost_price,
            sell_account_id: req.sell_account_id,
            cost_account_id: req.cost_account_id,
            inventory_account_id: req.inventory_account_id,
            note: req.note,
            active: req.active.unwrap_or(true),
        }
    }
}

/// Query parameters for listing items.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    /// Item type filter.
    pub item_type: Option<ItemType>,
    /// Search on name or SKU.
    pub search: Option<String>,
    /// Active flag filter.
    pub active: Option<bool>,
    /// Sort column.
    pub sort_by: Option<ItemSortColumn>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl From<ListItemsQuery> for ItemFilter {
    fn from(query: ListItemsQuery) -> Self {
        let defaults = PageRequest::default();
        Self {
            item_type: query.item_type,
            search: query.search,
            active: query.active,
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
            page: PageRequest::new(
                query.page.unwrap_or(defaults.page),
                query.per_page.unwrap_or(defaults.per_page),
            ),
        }
    }
}

/// Query parameters for bulk delete: `?ids=1,2,3`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteQuery {
    /// Comma-separated item ids.
    #[serde(default)]
    pub ids: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ItemRequest>,
) -> Response {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }

    info!(user_id = %auth.user_id(), role = auth.role(), "Create item requested");

    match item_service(&state)
        .create_item(auth.tenant_id(), payload.into())
        .await
    {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn edit_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
    Json(payload): Json<ItemRequest>,
) -> Response {
    // Field rules run in the service, after the item is found.
    match item_service(&state)
        .edit_item(auth.tenant_id(), ItemId::new(item_id), payload.into())
        .await
    {
        Ok(item) => Json(item).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn get_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
) -> Response {
    fetch_item(&state, &auth, ItemId::new(item_id)).await
}

async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> Response {
    fetch_items(&state, &auth, &ItemFilter::from(query)).await
}

async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
) -> Response {
    remove_item(&state, &auth, ItemId::new(item_id)).await
}

async fn bulk_delete_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BulkDeleteQuery>,
) -> Response {
    match parse_id_list::<ItemId>(&query.ids, "ids") {
        Ok(ids) => remove_items(&state, &auth, &ids).await,
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Shared Responses
// ============================================================================
//
// Used by the item routes and by store actions resolved against `items`.

pub(crate) async fn fetch_item(state: &AppState, auth: &AuthUser, id: ItemId) -> Response {
    match item_service(state).get_item(auth.tenant_id(), id).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn fetch_items(
    state: &AppState,
    auth: &AuthUser,
    filter: &ItemFilter,
) -> Response {
    match item_service(state).list_items(auth.tenant_id(), filter).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn remove_item(state: &AppState, auth: &AuthUser, id: ItemId) -> Response {
    match item_service(state).delete_item(auth.tenant_id(), id).await {
        Ok(()) => Json(json!({
            "id": id,
            "message": "The item has been deleted successfully."
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn remove_items(state: &AppState, auth: &AuthUser, ids: &[ItemId]) -> Response {
    match item_service(state)
        .bulk_delete_items(auth.tenant_id(), ids)
        .await
    {
        Ok(deleted) => Json(json!({
            "deleted": deleted,
            "message": "The items have been deleted successfully."
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::items::MAX_NAME_LEN;
    use tally_shared::types::pagination::MAX_PER_PAGE;

    fn request(name: &str) -> ItemRequest {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let input = ItemInput::from(request("Consulting"));

        assert_eq!(input.item_type, ItemType::Service);
        assert!(input.active);
        assert!(input.sell_price.is_none());
    }

    #[test]
    fn test_request_validation() {
        assert!(request("Widget").validate().is_ok());
        assert!(request("").validate().is_err());
        assert!(request(&"x".repeat(MAX_NAME_LEN + 1)).validate().is_err());

        let mut priced = request("Widget");
        priced.sell_price = Some(dec!(-1));
        let errors = priced.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sell_price"));

        priced.sell_price = Some(dec!(0));
        assert!(priced.validate().is_ok());
    }

    #[test]
    fn test_list_query_defaults() {
        let filter = ItemFilter::from(ListItemsQuery::default());

        assert_eq!(filter.sort_by, ItemSortColumn::CreatedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(filter.page, PageRequest::default());
    }

    #[test]
    fn test_list_query_clamps_page() {
        let filter = ItemFilter::from(ListItemsQuery {
            page: Some(0),
            per_page: Some(10_000),
            ..ListItemsQuery::default()
        });

        assert_eq!(filter.page.page, 1);
        assert_eq!(filter.page.per_page, MAX_PER_PAGE);
    }
}
