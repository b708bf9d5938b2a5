//! Item service tests against in-memory repositories.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal_macros::dec;
use tally_shared::types::{AccountId, ItemCategoryId, ItemId, PageRequest, TenantId};

use super::error::ItemError;
use super::service::{AccountRepository, ItemCategoryRepository, ItemRepository, ItemService};
use super::types::{AccountRecord, Item, ItemCategory, ItemFilter, ItemInput, ItemType};

const TENANT: TenantId = TenantId::new(1);
const OTHER_TENANT: TenantId = TenantId::new(2);

const SALES: AccountId = AccountId::new(10);
const OTHER_INCOME: AccountId = AccountId::new(11);
const COGS: AccountId = AccountId::new(20);
const STOCK: AccountId = AccountId::new(30);
const BANK: AccountId = AccountId::new(40);
const BROKEN: AccountId = AccountId::new(50);
const HARDWARE: ItemCategoryId = ItemCategoryId::new(5);

#[derive(Default)]
struct MockItemRepository {
    items: Mutex<HashMap<(TenantId, ItemId), Item>>,
    next_id: Mutex<i64>,
    writes: AtomicUsize,
}

impl MockItemRepository {
    fn count(&self, tenant_id: TenantId) -> usize {
        self.items
            .lock()
            .unwrap()
            .keys()
            .filter(|(t, _)| *t == tenant_id)
            .count()
    }

    fn contains(&self, tenant_id: TenantId, id: ItemId) -> bool {
        self.items.lock().unwrap().contains_key(&(tenant_id, id))
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn build(tenant_id: TenantId, id: ItemId, input: ItemInput) -> Item {
        let now = Utc::now();
        Item {
            id,
            tenant_id,
            name: input.name,
            item_type: input.item_type,
            sku: input.sku,
            category_id: input.category_id,
            sell_price: input.sell_price,
            cost_price: input.cost_price,
            sell_account_id: input.sell_account_id,
            cost_account_id: input.cost_account_id,
            inventory_account_id: input.inventory_account_id,
            note: input.note,
            active: input.active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ItemRepository for MockItemRepository {
    async fn find_by_id(&self, tenant_id: TenantId, id: ItemId) -> Result<Option<Item>, ItemError> {
        Ok(self.items.lock().unwrap().get(&(tenant_id, id)).cloned())
    }

    async fn name_exists(
        &self,
        tenant_id: TenantId,
        name: &str,
        exclude: Option<ItemId>,
    ) -> Result<bool, ItemError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .any(|i| i.tenant_id == tenant_id && i.name == name && Some(i.id) != exclude))
    }

    async fn create(&self, tenant_id: TenantId, input: ItemInput) -> Result<Item, ItemError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            ItemId::new(*next)
        };
        let item = Self::build(tenant_id, id, input);
        self.items
            .lock()
            .unwrap()
            .insert((tenant_id, id), item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: ItemId,
        input: ItemInput,
    ) -> Result<Item, ItemError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let item = Self::build(tenant_id, id, input);
        self.items
            .lock()
            .unwrap()
            .insert((tenant_id, id), item.clone());
        Ok(item)
    }

    async fn delete(&self, tenant_id: TenantId, id: ItemId) -> Result<bool, ItemError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.lock().unwrap().remove(&(tenant_id, id)).is_some())
    }

    async fn find_existing_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemId],
    ) -> Result<Vec<ItemId>, ItemError> {
        let items = self.items.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| items.contains_key(&(tenant_id, *id)))
            .collect())
    }

    async fn delete_many(&self, tenant_id: TenantId, ids: &[ItemId]) -> Result<u64, ItemError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        let removed = ids
            .iter()
            .filter(|id| items.remove(&(tenant_id, **id)).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn list(
        &self,
        tenant_id: TenantId,
        filter: &ItemFilter,
    ) -> Result<(Vec<Item>, u64), ItemError> {
        let mut matching: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.tenant_id == tenant_id && filter.matches(i))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(filter.page.offset()).unwrap())
            .take(usize::try_from(filter.page.limit()).unwrap())
            .collect();
        Ok((page, total))
    }
}

struct MockCategoryRepository {
    categories: Vec<(TenantId, ItemCategory)>,
}

impl ItemCategoryRepository for MockCategoryRepository {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ItemCategoryId,
    ) -> Result<Option<ItemCategory>, ItemError> {
        Ok(self
            .categories
            .iter()
            .find(|(t, c)| *t == tenant_id && c.id == id)
            .map(|(_, c)| c.clone()))
    }

    async fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemCategoryId],
    ) -> Result<Vec<ItemCategory>, ItemError> {
        Ok(self
            .categories
            .iter()
            .filter(|(t, c)| *t == tenant_id && ids.contains(&c.id))
            .map(|(_, c)| c.clone())
            .collect())
    }
}

struct MockAccountRepository {
    accounts: Vec<(TenantId, AccountRecord)>,
}

impl AccountRepository for MockAccountRepository {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AccountId,
    ) -> Result<Option<AccountRecord>, ItemError> {
        Ok(self
            .accounts
            .iter()
            .find(|(t, a)| *t == tenant_id && a.id == id)
            .map(|(_, a)| a.clone()))
    }

    async fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[AccountId],
    ) -> Result<Vec<AccountRecord>, ItemError> {
        Ok(self
            .accounts
            .iter()
            .filter(|(t, a)| *t == tenant_id && ids.contains(&a.id))
            .map(|(_, a)| a.clone())
            .collect())
    }
}

fn account(id: AccountId, name: &str, account_type: &str) -> (TenantId, AccountRecord) {
    (
        TENANT,
        AccountRecord {
            id,
            name: name.to_string(),
            code: None,
            account_type: account_type.to_string(),
            active: true,
        },
    )
}

type TestService = ItemService<MockItemRepository, MockCategoryRepository, MockAccountRepository>;

fn setup() -> (TestService, Arc<MockItemRepository>) {
    let items = Arc::new(MockItemRepository::default());
    let categories = Arc::new(MockCategoryRepository {
        categories: vec![(
            TENANT,
            ItemCategory {
                id: HARDWARE,
                name: "Hardware".to_string(),
                description: None,
            },
        )],
    });
    let accounts = Arc::new(MockAccountRepository {
        accounts: vec![
            account(SALES, "Sales", "income"),
            account(OTHER_INCOME, "Other Income", "other-income"),
            account(COGS, "Cost of Goods Sold", "cost-of-goods-sold"),
            account(STOCK, "Inventory Asset", "inventory"),
            account(BANK, "Bank", "bank"),
            account(BROKEN, "Legacy", "other_asset"),
        ],
    });
    (
        ItemService::new(Arc::clone(&items), categories, accounts),
        items,
    )
}

fn full_input(name: &str) -> ItemInput {
    ItemInput {
        item_type: ItemType::Inventory,
        sku: Some("  WID-1 ".to_string()),
        category_id: Some(HARDWARE),
        sell_price: Some(dec!(25.00)),
        cost_price: Some(dec!(10.00)),
        sell_account_id: Some(SALES),
        cost_account_id: Some(COGS),
        inventory_account_id: Some(STOCK),
        ..ItemInput::named(name)
    }
}

#[tokio::test]
async fn test_create_item_with_all_references() {
    let (service, repo) = setup();

    let item = service
        .create_item(TENANT, full_input("  Widget "))
        .await
        .unwrap();

    assert_eq!(item.name, "Widget");
    assert_eq!(item.sku.as_deref(), Some("WID-1"));
    assert_eq!(item.sell_account_id, Some(SALES));
    assert!(repo.contains(TENANT, item.id));
}

#[tokio::test]
async fn test_create_item_other_income_is_a_valid_sell_account() {
    let (service, _) = setup();
    let input = ItemInput {
        sell_account_id: Some(OTHER_INCOME),
        ..ItemInput::named("Consulting")
    };

    assert!(service.create_item(TENANT, input).await.is_ok());
}

#[tokio::test]
async fn test_create_item_sell_account_not_income_performs_no_write() {
    let (service, repo) = setup();
    let input = ItemInput {
        sell_account_id: Some(BANK),
        ..ItemInput::named("Widget")
    };

    let result = service.create_item(TENANT, input).await;

    assert_eq!(result, Err(ItemError::SellAccountNotIncome(BANK)));
    assert_eq!(repo.writes(), 0);
    assert_eq!(repo.count(TENANT), 0);
}

#[tokio::test]
async fn test_create_item_account_rules() {
    let (service, repo) = setup();
    let missing = AccountId::new(404);

    let cases = [
        (
            ItemInput {
                sell_account_id: Some(missing),
                ..ItemInput::named("A")
            },
            ItemError::SellAccountNotFound(missing),
        ),
        (
            ItemInput {
                cost_account_id: Some(SALES),
                ..ItemInput::named("B")
            },
            ItemError::CostAccountNotCogs(SALES),
        ),
        (
            ItemInput {
                cost_account_id: Some(missing),
                ..ItemInput::named("C")
            },
            ItemError::CostAccountNotFound(missing),
        ),
        (
            ItemInput {
                inventory_account_id: Some(BANK),
                ..ItemInput::named("D")
            },
            ItemError::InventoryAccountNotInventory(BANK),
        ),
        (
            ItemInput {
                inventory_account_id: Some(missing),
                ..ItemInput::named("E")
            },
            ItemError::InventoryAccountNotFound(missing),
        ),
        (
            ItemInput {
                category_id: Some(ItemCategoryId::new(99)),
                ..ItemInput::named("F")
            },
            ItemError::CategoryNotFound(ItemCategoryId::new(99)),
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(service.create_item(TENANT, input).await, Err(expected));
    }
    assert_eq!(repo.writes(), 0);
}

#[tokio::test]
async fn test_create_item_unknown_stored_account_type() {
    let (service, _) = setup();
    let input = ItemInput {
        inventory_account_id: Some(BROKEN),
        ..ItemInput::named("Widget")
    };

    let result = service.create_item(TENANT, input).await;

    assert_eq!(
        result,
        Err(ItemError::UnknownAccountType {
            account_id: BROKEN,
            key: "other_asset".to_string(),
        })
    );
}

#[tokio::test]
async fn test_create_item_validation_order() {
    let (service, _) = setup();
    service
        .create_item(TENANT, ItemInput::named("Widget"))
        .await
        .unwrap();

    // Duplicate name and bad category together: the name rule wins.
    let input = ItemInput {
        category_id: Some(ItemCategoryId::new(99)),
        sell_account_id: Some(BANK),
        ..ItemInput::named("Widget")
    };
    assert_eq!(
        service.create_item(TENANT, input).await,
        Err(ItemError::ItemNameExists("Widget".to_string()))
    );

    // Bad category and bad sell account: category wins.
    let input = ItemInput {
        category_id: Some(ItemCategoryId::new(99)),
        sell_account_id: Some(BANK),
        ..ItemInput::named("Gadget")
    };
    assert_eq!(
        service.create_item(TENANT, input).await,
        Err(ItemError::CategoryNotFound(ItemCategoryId::new(99)))
    );

    // Bad sell and bad cost: sell wins.
    let input = ItemInput {
        sell_account_id: Some(BANK),
        cost_account_id: Some(BANK),
        ..ItemInput::named("Gadget")
    };
    assert_eq!(
        service.create_item(TENANT, input).await,
        Err(ItemError::SellAccountNotIncome(BANK))
    );
}

#[tokio::test]
async fn test_create_item_field_rules() {
    let (service, repo) = setup();

    let blank = service.create_item(TENANT, ItemInput::named("   ")).await;
    assert!(matches!(blank, Err(ItemError::InvalidInput(_))));

    let long = service
        .create_item(TENANT, ItemInput::named("x".repeat(256)))
        .await;
    assert!(matches!(long, Err(ItemError::InvalidInput(_))));

    let negative = ItemInput {
        sell_price: Some(dec!(-1)),
        ..ItemInput::named("Widget")
    };
    let negative = service.create_item(TENANT, negative).await;
    assert!(matches!(negative, Err(ItemError::InvalidInput(_))));

    let long_sku = ItemInput {
        sku: Some("S".repeat(101)),
        ..ItemInput::named("Widget")
    };
    let long_sku = service.create_item(TENANT, long_sku).await;
    assert!(matches!(long_sku, Err(ItemError::InvalidInput(_))));

    let long_note = ItemInput {
        note: Some("n".repeat(2001)),
        ..ItemInput::named("Widget")
    };
    let long_note = service.create_item(TENANT, long_note).await;
    assert!(matches!(long_note, Err(ItemError::InvalidInput(_))));

    assert_eq!(repo.writes(), 0);
}

#[tokio::test]
async fn test_names_are_unique_per_tenant_only() {
    let (service, _) = setup();
    service
        .create_item(TENANT, ItemInput::named("Widget"))
        .await
        .unwrap();

    assert!(
        service
            .create_item(OTHER_TENANT, ItemInput::named("Widget"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_edit_item_not_found_before_field_validation() {
    let (service, repo) = setup();
    let input = ItemInput {
        sell_account_id: Some(BANK),
        ..ItemInput::named("")
    };

    let result = service.edit_item(TENANT, ItemId::new(999), input).await;

    assert_eq!(result, Err(ItemError::NotFound(ItemId::new(999))));
    assert_eq!(repo.writes(), 0);
}

#[tokio::test]
async fn test_edit_item_keeps_own_name() {
    let (service, _) = setup();
    let item = service
        .create_item(TENANT, full_input("Widget"))
        .await
        .unwrap();

    let input = ItemInput {
        sell_price: Some(dec!(30.00)),
        ..full_input("Widget")
    };
    let edited = service.edit_item(TENANT, item.id, input).await.unwrap();

    assert_eq!(edited.id, item.id);
    assert_eq!(edited.sell_price, Some(dec!(30.00)));
}

#[tokio::test]
async fn test_edit_item_rejects_other_items_name() {
    let (service, _) = setup();
    service
        .create_item(TENANT, ItemInput::named("Widget"))
        .await
        .unwrap();
    let gadget = service
        .create_item(TENANT, ItemInput::named("Gadget"))
        .await
        .unwrap();

    let result = service
        .edit_item(TENANT, gadget.id, ItemInput::named("Widget"))
        .await;

    assert_eq!(result, Err(ItemError::ItemNameExists("Widget".to_string())));
}

#[tokio::test]
async fn test_delete_item() {
    let (service, repo) = setup();
    let item = service
        .create_item(TENANT, ItemInput::named("Widget"))
        .await
        .unwrap();

    service.delete_item(TENANT, item.id).await.unwrap();
    assert!(!repo.contains(TENANT, item.id));

    assert_eq!(
        service.delete_item(TENANT, item.id).await,
        Err(ItemError::NotFound(item.id))
    );
}

#[tokio::test]
async fn test_delete_item_is_tenant_scoped() {
    let (service, repo) = setup();
    let item = service
        .create_item(TENANT, ItemInput::named("Widget"))
        .await
        .unwrap();

    assert_eq!(
        service.delete_item(OTHER_TENANT, item.id).await,
        Err(ItemError::NotFound(item.id))
    );
    assert!(repo.contains(TENANT, item.id));
}

#[tokio::test]
async fn test_bulk_delete_rejects_batch_with_missing_id() {
    let (service, repo) = setup();
    let first = service
        .create_item(TENANT, ItemInput::named("One"))
        .await
        .unwrap();
    let second = service
        .create_item(TENANT, ItemInput::named("Two"))
        .await
        .unwrap();
    assert_eq!((first.id, second.id), (ItemId::new(1), ItemId::new(2)));
    let writes_before = repo.writes();

    let result = service
        .bulk_delete_items(TENANT, &[ItemId::new(1), ItemId::new(2), ItemId::new(999)])
        .await;

    assert_eq!(result, Err(ItemError::ItemsNotFound(vec![ItemId::new(999)])));
    assert!(repo.contains(TENANT, ItemId::new(1)));
    assert!(repo.contains(TENANT, ItemId::new(2)));
    assert_eq!(repo.writes(), writes_before);
}

#[tokio::test]
async fn test_bulk_delete_collapses_duplicates() {
    let (service, repo) = setup();
    let item = service
        .create_item(TENANT, ItemInput::named("One"))
        .await
        .unwrap();
    service
        .create_item(TENANT, ItemInput::named("Two"))
        .await
        .unwrap();

    let deleted = service
        .bulk_delete_items(TENANT, &[item.id, item.id])
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(repo.count(TENANT), 1);
}

#[tokio::test]
async fn test_bulk_delete_empty_ids() {
    let (service, _) = setup();
    assert_eq!(
        service.bulk_delete_items(TENANT, &[]).await,
        Err(ItemError::EmptyItemIds)
    );
}

#[tokio::test]
async fn test_get_item_loads_relations() {
    let (service, _) = setup();
    let item = service
        .create_item(TENANT, full_input("Widget"))
        .await
        .unwrap();

    let details = service.get_item(TENANT, item.id).await.unwrap();

    assert_eq!(details.item, item);
    assert_eq!(details.category.map(|c| c.name).as_deref(), Some("Hardware"));
    assert_eq!(details.sell_account.map(|a| a.id), Some(SALES));
    assert_eq!(details.cost_account.map(|a| a.id), Some(COGS));
    assert_eq!(details.inventory_account.map(|a| a.id), Some(STOCK));

    assert_eq!(
        service.get_item(TENANT, ItemId::new(77)).await,
        Err(ItemError::NotFound(ItemId::new(77)))
    );
}

#[tokio::test]
async fn test_list_items_filters_and_pages() {
    let (service, _) = setup();
    service
        .create_item(TENANT, full_input("Widget"))
        .await
        .unwrap();
    for name in ["Consulting", "Design", "Support"] {
        service
            .create_item(TENANT, ItemInput::named(name))
            .await
            .unwrap();
    }
    service
        .create_item(OTHER_TENANT, ItemInput::named("Hidden"))
        .await
        .unwrap();

    let services = ItemFilter {
        item_type: Some(ItemType::Service),
        page: PageRequest::new(1, 2),
        ..ItemFilter::default()
    };
    let page = service.list_items(TENANT, &services).await.unwrap();
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    let names: Vec<_> = page.data.iter().map(|d| d.item.name.as_str()).collect();
    assert_eq!(names, vec!["Consulting", "Design"]);

    let search = ItemFilter {
        search: Some(" wid ".to_string()),
        ..ItemFilter::default()
    };
    let page = service.list_items(TENANT, &search).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].sell_account.as_ref().map(|a| a.id), Some(SALES));
}
