//! Client state-store action contract.
//!
//! The browser client dispatches actions of the shape
//! `{ "type": <intent>, "payload": ... }` against a resource (`items`,
//! `manual_journals`, ...). The store resolves each one against the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form table query (filters, sort, page) carried by list actions.
pub type TableQuery = Map<String, Value>;

/// A dispatchable action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreAction {
    /// Fetch a page of records.
    FetchList {
        /// Table query forwarded to the list endpoint.
        #[serde(default)]
        query: TableQuery,
    },
    /// Fetch a single record.
    FetchOne {
        /// Record id.
        id: i64,
    },
    /// Delete a single record.
    Delete {
        /// Record id.
        id: i64,
    },
    /// Delete several records at once.
    BulkDelete {
        /// Record ids.
        ids: Vec<i64>,
    },
    /// Publish a draft record.
    Publish {
        /// Record id.
        id: i64,
    },
    /// Switch the table to a saved view.
    SetCurrentView {
        /// View id.
        #[serde(rename = "viewId")]
        view_id: i64,
    },
    /// Merge queries into the table state.
    TableQueriesAdd {
        /// Queries to merge.
        queries: TableQuery,
    },
}

impl StoreAction {
    /// The intent name as it appears on the wire.
    #[must_use]
    pub const fn intent(&self) -> &'static str {
        match self {
            Self::FetchList { .. } => "FETCH_LIST",
            Self::FetchOne { .. } => "FETCH_ONE",
            Self::Delete { .. } => "DELETE",
            Self::BulkDelete { .. } => "BULK_DELETE",
            Self::Publish { .. } => "PUBLISH",
            Self::SetCurrentView { .. } => "SET_CURRENT_VIEW",
            Self::TableQueriesAdd { .. } => "TABLE_QUERIES_ADD",
        }
    }

    /// Returns true when resolving this action changes server state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Delete { .. } | Self::BulkDelete { .. } | Self::Publish { .. }
        )
    }

    /// Returns true for actions that only touch client UI state.
    #[must_use]
    pub const fn is_ui_state(&self) -> bool {
        matches!(self, Self::SetCurrentView { .. } | Self::TableQueriesAdd { .. })
    }

    /// Record ids this action targets, if any.
    #[must_use]
    pub fn target_ids(&self) -> Vec<i64> {
        match self {
            Self::FetchOne { id } | Self::Delete { id } | Self::Publish { id } => vec![*id],
            Self::BulkDelete { ids } => ids.clone(),
            Self::FetchList { .. } | Self::SetCurrentView { .. } | Self::TableQueriesAdd { .. } => {
                Vec::new()
            }
        }
    }
}

/// An action scoped to the resource it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedAction {
    /// Resource name, e.g. `items`.
    pub resource: String,
    /// The action.
    pub action: StoreAction,
}

impl ScopedAction {
    /// Creates a scoped action.
    #[must_use]
    pub fn new(resource: impl Into<String>, action: StoreAction) -> Self {
        Self {
            resource: resource.into(),
            action,
        }
    }
}
