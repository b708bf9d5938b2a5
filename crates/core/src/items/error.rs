//! Item error types.

use tally_shared::types::{AccountId, ItemCategoryId, ItemId};
use thiserror::Error;

/// Item operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Item not found.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// Some of the requested items do not exist.
    #[error("items not found: {}", join_ids(.0))]
    ItemsNotFound(Vec<ItemId>),

    /// Bulk operation called without ids.
    #[error("no item ids given")]
    EmptyItemIds,

    /// Another item of the tenant already uses this name.
    #[error("item name already exists: {0}")]
    ItemNameExists(String),

    /// Category not found.
    #[error("item category not found: {0}")]
    CategoryNotFound(ItemCategoryId),

    /// Sell account not found.
    #[error("sell account not found: {0}")]
    SellAccountNotFound(AccountId),

    /// Sell account is not an income account.
    #[error("sell account {0} is not an income account")]
    SellAccountNotIncome(AccountId),

    /// Cost account not found.
    #[error("cost account not found: {0}")]
    CostAccountNotFound(AccountId),

    /// Cost account is not a cost of goods sold account.
    #[error("cost account {0} is not a cost of goods sold account")]
    CostAccountNotCogs(AccountId),

    /// Inventory account not found.
    #[error("inventory account not found: {0}")]
    InventoryAccountNotFound(AccountId),

    /// Inventory account is not an inventory account.
    #[error("inventory account {0} is not an inventory account")]
    InventoryAccountNotInventory(AccountId),

    /// Input failed a field rule.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored account carries a type key the taxonomy does not know.
    #[error("account {account_id} has unknown account type '{key}'")]
    UnknownAccountType {
        /// Account ID.
        account_id: AccountId,
        /// Stored type key.
        key: String,
    },

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ItemError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ITEM_NOT_FOUND",
            Self::ItemsNotFound(_) => "ITEMS_NOT_FOUND",
            Self::EmptyItemIds => "EMPTY_ITEM_IDS",
            Self::ItemNameExists(_) => "ITEM_NAME_EXISTS",
            Self::CategoryNotFound(_) => "ITEM_CATEGORY_NOT_FOUND",
            Self::SellAccountNotFound(_) => "SELL_ACCOUNT_NOT_FOUND",
            Self::SellAccountNotIncome(_) => "SELL_ACCOUNT_NOT_INCOME",
            Self::CostAccountNotFound(_) => "COST_ACCOUNT_NOT_FOUND",
            Self::CostAccountNotCogs(_) => "COST_ACCOUNT_NOT_COGS",
            Self::InventoryAccountNotFound(_) => "INVENTORY_ACCOUNT_NOT_FOUND",
            Self::InventoryAccountNotInventory(_) => "INVENTORY_ACCOUNT_NOT_INVENTORY",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownAccountType { .. } => "UNKNOWN_ACCOUNT_TYPE",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::ItemsNotFound(_) => 404,
            Self::ItemNameExists(_) => 409,
            Self::CategoryNotFound(_)
            | Self::SellAccountNotFound(_)
            | Self::SellAccountNotIncome(_)
            | Self::CostAccountNotFound(_)
            | Self::CostAccountNotCogs(_)
            | Self::InventoryAccountNotFound(_)
            | Self::InventoryAccountNotInventory(_) => 422,
            Self::EmptyItemIds | Self::InvalidInput(_) => 400,
            Self::UnknownAccountType { .. } | Self::Repository(_) => 500,
        }
    }
}
