//! Item types and data structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, ItemCategoryId, ItemId, PageRequest, TenantId};

use crate::accounts::{AccountType, TaxonomyError, lookup};

/// Largest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Largest accepted SKU, in characters.
pub const MAX_SKU_LEN: usize = 100;

/// Largest accepted note, in characters.
pub const MAX_NOTE_LEN: usize = 2000;

/// Item classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    /// A service; never stocked.
    #[default]
    Service,
    /// A stocked item tracked through an inventory account.
    Inventory,
    /// A purchased or sold good that is not stocked.
    NonInventory,
}

impl ItemType {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Inventory => "inventory",
            Self::NonInventory => "non-inventory",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "service" => Some(Self::Service),
            "inventory" => Some(Self::Inventory),
            "non-inventory" => Some(Self::NonInventory),
            _ => None,
        }
    }
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item ID.
    pub id: ItemId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name, unique per tenant.
    pub name: String,
    /// Classification.
    pub item_type: ItemType,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Category.
    pub category_id: Option<ItemCategoryId>,
    /// Selling price.
    pub sell_price: Option<Decimal>,
    /// Purchase cost.
    pub cost_price: Option<Decimal>,
    /// Income account credited on sale.
    pub sell_account_id: Option<AccountId>,
    /// Cost of goods sold account debited on sale.
    pub cost_account_id: Option<AccountId>,
    /// Inventory asset account.
    pub inventory_account_id: Option<AccountId>,
    /// Free-form note.
    pub note: Option<String>,
    /// Whether the item can be used on new documents.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or editing an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    /// Display name.
    pub name: String,
    /// Classification.
    #[serde(default)]
    pub item_type: ItemType,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Category.
    #[serde(default)]
    pub category_id: Option<ItemCategoryId>,
    /// Selling price.
    #[serde(default)]
    pub sell_price: Option<Decimal>,
    /// Purchase cost.
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    /// Income account.
    #[serde(default)]
    pub sell_account_id: Option<AccountId>,
    /// Cost of goods sold account.
    #[serde(default)]
    pub cost_account_id: Option<AccountId>,
    /// Inventory account.
    #[serde(default)]
    pub inventory_account_id: Option<AccountId>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
    /// Active flag.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ItemInput {
    /// Creates an active service item input with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: ItemType::default(),
            sku: None,
            category_id: None,
            sell_price: None,
            cost_price: None,
            sell_account_id: None,
            cost_account_id: None,
            inventory_account_id: None,
            note: None,
            active: true,
        }
    }
}

/// An account as seen by item validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: AccountId,
    /// Account name.
    pub name: String,
    /// Account code.
    pub code: Option<String>,
    /// Account type key, see [`crate::accounts::AccountTypeKey`].
    pub account_type: String,
    /// Active flag.
    pub active: bool,
}

impl AccountRecord {
    /// Resolves the stored type key against the taxonomy.
    pub fn resolve_type(&self) -> Result<&'static AccountType, TaxonomyError> {
        lookup(&self.account_type)
    }
}

/// An item category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategory {
    /// Category ID.
    pub id: ItemCategoryId,
    /// Category name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

/// An item with its related records loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// The item.
    #[serde(flatten)]
    pub item: Item,
    /// Category, when assigned.
    pub category: Option<ItemCategory>,
    /// Sell account, when assigned.
    pub sell_account: Option<AccountRecord>,
    /// Cost account, when assigned.
    pub cost_account: Option<AccountRecord>,
    /// Inventory account, when assigned.
    pub inventory_account: Option<AccountRecord>,
}

/// Sortable item columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSortColumn {
    /// Name.
    Name,
    /// SKU.
    Sku,
    /// Selling price.
    SellPrice,
    /// Cost price.
    CostPrice,
    /// Creation time.
    #[default]
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Dynamic filter for item listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Restrict to one item type (the service / inventory / non-inventory views).
    pub item_type: Option<ItemType>,
    /// Case-insensitive match on name or SKU.
    pub search: Option<String>,
    /// Restrict by active flag.
    pub active: Option<bool>,
    /// Sort column.
    pub sort_by: ItemSortColumn,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page.
    pub page: PageRequest,
}

impl ItemFilter {
    /// Returns the trimmed search term, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true when the item passes the type, active and search filters.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if self.item_type.is_some_and(|t| t != item.item_type) {
            return false;
        }
        if self.active.is_some_and(|a| a != item.active) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                item.name.to_lowercase().contains(&term)
                    || item
                        .sku
                        .as_deref()
                        .is_some_and(|sku| sku.to_lowercase().contains(&term))
            }
        }
    }
}
