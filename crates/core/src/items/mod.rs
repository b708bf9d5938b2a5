//! Items: services and goods a tenant sells or buys.
//!
//! The service checks every write against the tenant's reference data:
//! - Names are unique per tenant
//! - The category must exist
//! - The sell account must be an income account
//! - The cost account must be a cost of goods sold account
//! - The inventory account must be an inventory account

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ItemError;
pub use service::{AccountRepository, ItemCategoryRepository, ItemRepository, ItemService};
pub use types::{
    AccountRecord, Item, ItemCategory, ItemDetails, ItemFilter, ItemInput, ItemSortColumn,
    ItemType, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SKU_LEN, SortOrder,
};
