//! Store action route.
//!
//! Resolves a client store action (`{ "resource", "action": { "type",
//! "payload" } }`) against the resource's API operations. UI-state intents
//! never reach the server and are rejected.

use axum::{Json, Router, extract::State, response::Response, routing::post};
use serde_json::Value;
use tally_core::actions::{ScopedAction, StoreAction, TableQuery};
use tally_core::items::ItemFilter;
use tally_shared::AppError;
use tally_shared::types::ItemId;
use tracing::info;

use crate::error::error_response;
use crate::routes::items::{self, ListItemsQuery};
use crate::{AppState, middleware::AuthUser};

/// Resource name of items in store actions.
const ITEMS: &str = "items";

/// Creates the action route (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/actions", post(dispatch_action))
}

async fn dispatch_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(scoped): Json<ScopedAction>,
) -> Response {
    let ScopedAction { resource, action } = scoped;
    let intent = action.intent();

    info!(
        resource = %resource,
        intent,
        mutation = action.is_mutation(),
        targets = ?action.target_ids(),
        "Dispatching store action"
    );

    if action.is_ui_state() {
        return error_response(&AppError::Validation(format!(
            "{intent} is resolved by the client"
        )));
    }
    if resource != ITEMS {
        return error_response(&AppError::NotFound(format!("unknown resource: {resource}")));
    }

    match action {
        StoreAction::FetchList { query } => match table_filter(query) {
            Ok(filter) => items::fetch_items(&state, &auth, &filter).await,
            Err(e) => error_response(&e),
        },
        StoreAction::FetchOne { id } => items::fetch_item(&state, &auth, ItemId::new(id)).await,
        StoreAction::Delete { id } => items::remove_item(&state, &auth, ItemId::new(id)).await,
        StoreAction::BulkDelete { ids } => {
            let ids: Vec<ItemId> = ids.into_iter().map(ItemId::new).collect();
            items::remove_items(&state, &auth, &ids).await
        }
        StoreAction::Publish { .. }
        | StoreAction::SetCurrentView { .. }
        | StoreAction::TableQueriesAdd { .. } => error_response(&AppError::Validation(format!(
            "{intent} is not supported for {ITEMS}"
        ))),
    }
}

/// Reads a table query with the same keys the list endpoint accepts.
fn table_filter(query: TableQuery) -> Result<ItemFilter, AppError> {
    serde_json::from_value::<ListItemsQuery>(Value::Object(query))
        .map(ItemFilter::from)
        .map_err(|e| AppError::Validation(format!("query: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_core::items::{ItemSortColumn, ItemType, SortOrder};

    fn table_query(value: Value) -> TableQuery {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_table_filter_reads_list_keys() {
        let filter = table_filter(table_query(json!({
            "item_type": "inventory",
            "search": "widget",
            "sort_by": "name",
            "sort_order": "asc",
            "page": 2,
            "per_page": 10
        })))
        .unwrap();

        assert_eq!(filter.item_type, Some(ItemType::Inventory));
        assert_eq!(filter.search.as_deref(), Some("widget"));
        assert_eq!(filter.sort_by, ItemSortColumn::Name);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!(filter.page.page, 2);
        assert_eq!(filter.page.per_page, 10);
    }

    #[test]
    fn test_table_filter_rejects_bad_values() {
        let err = table_filter(table_query(json!({ "item_type": "bundle" }))).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
