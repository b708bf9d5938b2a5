//! Database seeder for Tally development and testing.
//!
//! Seeds a demo tenant with a small chart of accounts, item categories,
//! items, customers, vendors and their ledger entries, then prints an access
//! token for the tenant.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tally_core::accounts::AccountTypeKey;
use tally_core::items::{ItemInput, ItemService, ItemType};
use tally_core::reports::ContactKind;
use tally_db::entities::{accounts, contact_ledger_entries, contacts, item_categories, tenants};
use tally_db::{AccountRepository, ItemCategoryRepository, ItemRepository};
use tally_shared::types::{AccountId, ItemCategoryId, TenantId};
use tally_shared::{AppConfig, JwtConfig, JwtService};
use uuid::Uuid;

const DEMO_TENANT: &str = "Demo Company";

/// Chart of accounts seeded for the demo tenant.
const ACCOUNTS: [(&str, &str, AccountTypeKey); 8] = [
    ("1000", "Petty Cash", AccountTypeKey::Cash),
    ("1100", "Accounts Receivable", AccountTypeKey::AccountsReceivable),
    ("1200", "Inventory Asset", AccountTypeKey::Inventory),
    ("2000", "Accounts Payable", AccountTypeKey::AccountsPayable),
    ("4000", "Sales of Product Income", AccountTypeKey::Income),
    ("4100", "Service Income", AccountTypeKey::Income),
    ("5000", "Cost of Goods Sold", AccountTypeKey::CostOfGoodsSold),
    ("6000", "Office Expenses", AccountTypeKey::Expense),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = tally_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if let Some(existing) = tenants::Entity::find()
        .filter(tenants::Column::Name.eq(DEMO_TENANT))
        .one(&db)
        .await?
    {
        println!("  Demo tenant already exists (id {}), skipping...", existing.id);
        print_token(&config, TenantId::new(existing.id))?;
        return Ok(());
    }

    println!("Seeding demo tenant...");
    let tenant_id = seed_tenant(&db).await?;

    println!("Seeding chart of accounts...");
    let accounts = seed_accounts(&db, tenant_id).await?;

    println!("Seeding item categories...");
    let categories = seed_categories(&db, tenant_id).await?;

    println!("Seeding items...");
    seed_items(&db, tenant_id, &accounts, &categories).await?;

    println!("Seeding customers, vendors and ledger entries...");
    seed_contacts(&db, tenant_id, &accounts).await?;

    println!("Seeding complete!");
    print_token(&config, tenant_id)
}

fn print_token(config: &AppConfig, tenant_id: TenantId) -> anyhow::Result<()> {
    let jwt = JwtService::new(JwtConfig::from(&config.jwt));
    let token = jwt.generate_access_token(Uuid::new_v4(), tenant_id, "admin")?;
    println!("Access token for tenant {tenant_id}:\n{token}");
    Ok(())
}

async fn seed_tenant(db: &DatabaseConnection) -> anyhow::Result<TenantId> {
    let tenant = tenants::ActiveModel {
        name: Set(DEMO_TENANT.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    println!("  Created tenant: {DEMO_TENANT} (id {})", tenant.id);
    Ok(TenantId::new(tenant.id))
}

/// Returns the created account ids in `ACCOUNTS` order.
async fn seed_accounts(
    db: &DatabaseConnection,
    tenant_id: TenantId,
) -> anyhow::Result<Vec<AccountId>> {
    let mut ids = Vec::with_capacity(ACCOUNTS.len());

    for (code, name, key) in ACCOUNTS {
        let account = accounts::ActiveModel {
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(name.to_string()),
            code: Set(Some(code.to_string())),
            account_type: Set(key.as_str().to_string()),
            active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        println!("  {code} {name} ({key})");
        ids.push(AccountId::new(account.id));
    }

    Ok(ids)
}

async fn seed_categories(
    db: &DatabaseConnection,
    tenant_id: TenantId,
) -> anyhow::Result<Vec<ItemCategoryId>> {
    let mut ids = Vec::new();

    for (name, description) in [
        ("Hardware", "Physical goods kept in stock"),
        ("Services", "Billable time and consulting"),
    ] {
        let category = item_categories::ActiveModel {
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        ids.push(ItemCategoryId::new(category.id));
    }

    Ok(ids)
}

/// Creates items through the item service so the account rules apply.
async fn seed_items(
    db: &DatabaseConnection,
    tenant_id: TenantId,
    accounts: &[AccountId],
    categories: &[ItemCategoryId],
) -> anyhow::Result<()> {
    let service = ItemService::new(
        Arc::new(ItemRepository::new(db.clone())),
        Arc::new(ItemCategoryRepository::new(db.clone())),
        Arc::new(AccountRepository::new(db.clone())),
    );

    let (inventory, product_income, service_income, cogs) =
        (accounts[2], accounts[4], accounts[5], accounts[6]);

    let items = [
        ItemInput {
            item_type: ItemType::Inventory,
            sku: Some("HW-001".to_string()),
            category_id: Some(categories[0]),
            sell_price: Some(dec!(149.00)),
            cost_price: Some(dec!(90.00)),
            sell_account_id: Some(product_income),
            cost_account_id: Some(cogs),
            inventory_account_id: Some(inventory),
            ..ItemInput::named("Wireless Router")
        },
        ItemInput {
            item_type: ItemType::NonInventory,
            sku: Some("HW-002".to_string()),
            category_id: Some(categories[0]),
            sell_price: Some(dec!(12.50)),
            sell_account_id: Some(product_income),
            ..ItemInput::named("Ethernet Cable")
        },
        ItemInput {
            category_id: Some(categories[1]),
            sell_price: Some(dec!(95.00)),
            sell_account_id: Some(service_income),
            note: Some("Billed per hour".to_string()),
            ..ItemInput::named("Network Setup")
        },
    ];

    for input in items {
        let item = service.create_item(tenant_id, input).await?;
        println!("  Created item: {} ({})", item.name, item.item_type.as_str());
    }

    Ok(())
}

async fn seed_contacts(
    db: &DatabaseConnection,
    tenant_id: TenantId,
    accounts: &[AccountId],
) -> anyhow::Result<()> {
    let (receivable, payable) = (accounts[1], accounts[3]);

    let customer = insert_contact(db, tenant_id, ContactKind::Customer, "Acme Corporation").await?;
    insert_contact(db, tenant_id, ContactKind::Customer, "Globex Inc").await?;
    let vendor = insert_contact(db, tenant_id, ContactKind::Vendor, "Initech Supplies").await?;

    let year = Utc::now().year();
    let date = |month: u32, day: u32| {
        NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")
    };

    let entries = [
        (customer, receivable, date(1, 5)?, "Invoice", "INV-0001", dec!(1500), Decimal::ZERO),
        (customer, receivable, date(1, 20)?, "Payment received", "PR-0001", Decimal::ZERO, dec!(1000)),
        (customer, receivable, date(2, 3)?, "Invoice", "INV-0002", dec!(640), Decimal::ZERO),
        (vendor, payable, date(1, 12)?, "Bill", "BILL-0001", Decimal::ZERO, dec!(2700)),
        (vendor, payable, date(2, 1)?, "Payment made", "PM-0001", dec!(2700), Decimal::ZERO),
    ];

    for (contact_id, account_id, entry_date, reference_type, number, debit, credit) in entries {
        contact_ledger_entries::ActiveModel {
            tenant_id: Set(tenant_id.into_inner()),
            contact_id: Set(contact_id),
            account_id: Set(account_id.into_inner()),
            entry_date: Set(entry_date),
            reference_type: Set(reference_type.to_string()),
            transaction_number: Set(Some(number.to_string())),
            debit: Set(debit),
            credit: Set(credit),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn insert_contact(
    db: &DatabaseConnection,
    tenant_id: TenantId,
    kind: ContactKind,
    name: &str,
) -> anyhow::Result<i64> {
    let contact = contacts::ActiveModel {
        tenant_id: Set(tenant_id.into_inner()),
        kind: Set(kind.as_str().to_string()),
        display_name: Set(name.to_string()),
        active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    println!("  Created {}: {name}", kind.as_str());
    Ok(contact.id)
}
