//! Item service implementation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, ItemCategoryId, ItemId, PageResponse, TenantId};
use tracing::{debug, info, warn};

use super::error::ItemError;
use super::types::{
    AccountRecord, Item, ItemCategory, ItemDetails, ItemFilter, ItemInput, MAX_NAME_LEN,
    MAX_NOTE_LEN, MAX_SKU_LEN,
};
use crate::accounts::{AccountType, AccountTypeKey, RootType};

/// Repository trait for item persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// Every method is scoped to one tenant.
pub trait ItemRepository: Send + Sync {
    /// Find item by ID.
    fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ItemId,
    ) -> impl std::future::Future<Output = Result<Option<Item>, ItemError>> + Send;

    /// Check whether another item already uses `name`, ignoring `exclude`.
    fn name_exists(
        &self,
        tenant_id: TenantId,
        name: &str,
        exclude: Option<ItemId>,
    ) -> impl std::future::Future<Output = Result<bool, ItemError>> + Send;

    /// Insert a new item.
    fn create(
        &self,
        tenant_id: TenantId,
        input: ItemInput,
    ) -> impl std::future::Future<Output = Result<Item, ItemError>> + Send;

    /// Overwrite an existing item.
    fn update(
        &self,
        tenant_id: TenantId,
        id: ItemId,
        input: ItemInput,
    ) -> impl std::future::Future<Output = Result<Item, ItemError>> + Send;

    /// Delete item by ID.
    fn delete(
        &self,
        tenant_id: TenantId,
        id: ItemId,
    ) -> impl std::future::Future<Output = Result<bool, ItemError>> + Send;

    /// Return the subset of `ids` that exist.
    fn find_existing_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemId],
    ) -> impl std::future::Future<Output = Result<Vec<ItemId>, ItemError>> + Send;

    /// Delete all given items, returning the number removed.
    fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[ItemId],
    ) -> impl std::future::Future<Output = Result<u64, ItemError>> + Send;

    /// List one page of items matching the filter, with the total match count.
    fn list(
        &self,
        tenant_id: TenantId,
        filter: &ItemFilter,
    ) -> impl std::future::Future<Output = Result<(Vec<Item>, u64), ItemError>> + Send;
}

/// Repository trait for item categories.
pub trait ItemCategoryRepository: Send + Sync {
    /// Find category by ID.
    fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ItemCategoryId,
    ) -> impl std::future::Future<Output = Result<Option<ItemCategory>, ItemError>> + Send;

    /// Find all categories with the given IDs.
    fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemCategoryId],
    ) -> impl std::future::Future<Output = Result<Vec<ItemCategory>, ItemError>> + Send;
}

/// Repository trait for the accounts items reference.
pub trait AccountRepository: Send + Sync {
    /// Find account by ID.
    fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AccountId,
    ) -> impl std::future::Future<Output = Result<Option<AccountRecord>, ItemError>> + Send;

    /// Find all accounts with the given IDs.
    fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[AccountId],
    ) -> impl std::future::Future<Output = Result<Vec<AccountRecord>, ItemError>> + Send;
}

/// Item service guarding item writes with the tenant's reference data.
pub struct ItemService<I, C, A>
where
    I: ItemRepository,
    C: ItemCategoryRepository,
    A: AccountRepository,
{
    items: Arc<I>,
    categories: Arc<C>,
    accounts: Arc<A>,
}

impl<I, C, A> ItemService<I, C, A>
where
    I: ItemRepository,
    C: ItemCategoryRepository,
    A: AccountRepository,
{
    /// Create a new item service.
    #[must_use]
    pub fn new(items: Arc<I>, categories: Arc<C>, accounts: Arc<A>) -> Self {
        Self {
            items,
            categories,
            accounts,
        }
    }

    /// Create an item.
    ///
    /// Rules run in order: field rules, name uniqueness, category, sell
    /// account, cost account, inventory account. Nothing is written unless
    /// all pass.
    pub async fn create_item(
        &self,
        tenant_id: TenantId,
        input: ItemInput,
    ) -> Result<Item, ItemError> {
        info!(tenant_id = %tenant_id, name = %input.name, "Creating item");

        let input = normalize(input)?;
        self.validate(tenant_id, &input, None).await?;

        let item = self.items.create(tenant_id, input).await?;
        info!(tenant_id = %tenant_id, item_id = %item.id, "Item created");
        Ok(item)
    }

    /// Edit an item.
    ///
    /// The item must exist before any field is looked at. The name check
    /// ignores the item itself.
    pub async fn edit_item(
        &self,
        tenant_id: TenantId,
        id: ItemId,
        input: ItemInput,
    ) -> Result<Item, ItemError> {
        info!(tenant_id = %tenant_id, item_id = %id, "Editing item");

        self.require_item(tenant_id, id).await?;

        let input = normalize(input)?;
        self.validate(tenant_id, &input, Some(id)).await?;

        let item = self.items.update(tenant_id, id, input).await?;
        info!(tenant_id = %tenant_id, item_id = %id, "Item edited");
        Ok(item)
    }

    /// Delete an item.
    pub async fn delete_item(&self, tenant_id: TenantId, id: ItemId) -> Result<(), ItemError> {
        info!(tenant_id = %tenant_id, item_id = %id, "Deleting item");

        self.require_item(tenant_id, id).await?;
        self.items.delete(tenant_id, id).await?;

        info!(tenant_id = %tenant_id, item_id = %id, "Item deleted");
        Ok(())
    }

    /// Delete several items.
    ///
    /// Duplicate ids collapse. If any id does not exist the whole batch is
    /// rejected with the missing ids and nothing is deleted.
    pub async fn bulk_delete_items(
        &self,
        tenant_id: TenantId,
        ids: &[ItemId],
    ) -> Result<u64, ItemError> {
        let mut seen = HashSet::new();
        let ids: Vec<ItemId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        info!(tenant_id = %tenant_id, count = ids.len(), "Bulk deleting items");

        if ids.is_empty() {
            return Err(ItemError::EmptyItemIds);
        }

        let existing: HashSet<ItemId> = self
            .items
            .find_existing_ids(tenant_id, &ids)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();

        if !missing.is_empty() {
            warn!(tenant_id = %tenant_id, missing = ?missing, "Bulk delete rejected");
            return Err(ItemError::ItemsNotFound(missing));
        }

        let deleted = self.items.delete_many(tenant_id, &ids).await?;
        info!(tenant_id = %tenant_id, deleted, "Items bulk deleted");
        Ok(deleted)
    }

    /// Get one item with its accounts and category.
    pub async fn get_item(&self, tenant_id: TenantId, id: ItemId) -> Result<ItemDetails, ItemError> {
        let item = self.require_item(tenant_id, id).await?;
        let mut details = self.load_details(tenant_id, vec![item]).await?;
        details.pop().ok_or(ItemError::NotFound(id))
    }

    /// List items matching the filter, with accounts and category loaded.
    pub async fn list_items(
        &self,
        tenant_id: TenantId,
        filter: &ItemFilter,
    ) -> Result<PageResponse<ItemDetails>, ItemError> {
        debug!(tenant_id = %tenant_id, filter = ?filter, "Listing items");

        let (items, total) = self.items.list(tenant_id, filter).await?;
        let details = self.load_details(tenant_id, items).await?;
        Ok(PageResponse::new(details, filter.page, total))
    }

    async fn require_item(&self, tenant_id: TenantId, id: ItemId) -> Result<Item, ItemError> {
        self.items
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| {
                warn!(tenant_id = %tenant_id, item_id = %id, "Item not found");
                ItemError::NotFound(id)
            })
    }

    async fn validate(
        &self,
        tenant_id: TenantId,
        input: &ItemInput,
        exclude: Option<ItemId>,
    ) -> Result<(), ItemError> {
        if self
            .items
            .name_exists(tenant_id, &input.name, exclude)
            .await?
        {
            warn!(tenant_id = %tenant_id, name = %input.name, "Item name already exists");
            return Err(ItemError::ItemNameExists(input.name.clone()));
        }

        if let Some(category_id) = input.category_id {
            let category = self.categories.find_by_id(tenant_id, category_id).await?;
            if category.is_none() {
                warn!(tenant_id = %tenant_id, category_id = %category_id, "Item category not found");
                return Err(ItemError::CategoryNotFound(category_id));
            }
        }

        if let Some(account_id) = input.sell_account_id {
            let account_type = self
                .account_type(tenant_id, account_id, ItemError::SellAccountNotFound)
                .await?;
            if account_type.root_type != RootType::Income {
                warn!(tenant_id = %tenant_id, account_id = %account_id, "Sell account is not income");
                return Err(ItemError::SellAccountNotIncome(account_id));
            }
        }

        if let Some(account_id) = input.cost_account_id {
            let account_type = self
                .account_type(tenant_id, account_id, ItemError::CostAccountNotFound)
                .await?;
            if !account_type.is(AccountTypeKey::CostOfGoodsSold) {
                warn!(tenant_id = %tenant_id, account_id = %account_id, "Cost account is not COGS");
                return Err(ItemError::CostAccountNotCogs(account_id));
            }
        }

        if let Some(account_id) = input.inventory_account_id {
            let account_type = self
                .account_type(tenant_id, account_id, ItemError::InventoryAccountNotFound)
                .await?;
            if !account_type.is(AccountTypeKey::Inventory) {
                warn!(tenant_id = %tenant_id, account_id = %account_id, "Inventory account is not inventory");
                return Err(ItemError::InventoryAccountNotInventory(account_id));
            }
        }

        Ok(())
    }

    async fn account_type(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        not_found: fn(AccountId) -> ItemError,
    ) -> Result<&'static AccountType, ItemError> {
        let account = self
            .accounts
            .find_by_id(tenant_id, account_id)
            .await?
            .ok_or_else(|| {
                warn!(tenant_id = %tenant_id, account_id = %account_id, "Account not found");
                not_found(account_id)
            })?;

        account
            .resolve_type()
            .map_err(|_| ItemError::UnknownAccountType {
                account_id,
                key: account.account_type.clone(),
            })
    }

    async fn load_details(
        &self,
        tenant_id: TenantId,
        items: Vec<Item>,
    ) -> Result<Vec<ItemDetails>, ItemError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let category_ids: Vec<ItemCategoryId> = items
            .iter()
            .filter_map(|i| i.category_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let account_ids: Vec<AccountId> = items
            .iter()
            .flat_map(|i| [i.sell_account_id, i.cost_account_id, i.inventory_account_id])
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let categories: HashMap<ItemCategoryId, ItemCategory> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            self.categories
                .find_by_ids(tenant_id, &category_ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };
        let accounts: HashMap<AccountId, AccountRecord> = if account_ids.is_empty() {
            HashMap::new()
        } else {
            self.accounts
                .find_by_ids(tenant_id, &account_ids)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect()
        };

        let account = |id: Option<AccountId>| id.and_then(|id| accounts.get(&id).cloned());

        Ok(items
            .into_iter()
            .map(|item| ItemDetails {
                category: item.category_id.and_then(|id| categories.get(&id).cloned()),
                sell_account: account(item.sell_account_id),
                cost_account: account(item.cost_account_id),
                inventory_account: account(item.inventory_account_id),
                item,
            })
            .collect())
    }
}

/// Trims text fields and applies the field rules.
fn normalize(mut input: ItemInput) -> Result<ItemInput, ItemError> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(ItemError::invalid_input("name must not be blank"));
    }
    if input.name.chars().count() > MAX_NAME_LEN {
        return Err(ItemError::invalid_input(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if input.sell_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ItemError::invalid_input("sell_price must not be negative"));
    }
    if input.cost_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ItemError::invalid_input("cost_price must not be negative"));
    }
    input.sku = input
        .sku
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if input.sku.as_ref().is_some_and(|s| s.chars().count() > MAX_SKU_LEN) {
        return Err(ItemError::invalid_input(format!(
            "sku must be at most {MAX_SKU_LEN} characters"
        )));
    }
    if input.note.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTE_LEN) {
        return Err(ItemError::invalid_input(format!(
            "note must be at most {MAX_NOTE_LEN} characters"
        )));
    }
    Ok(input)
}
