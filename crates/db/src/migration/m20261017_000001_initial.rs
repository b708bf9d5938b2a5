//! Initial schema: tenants, chart of accounts, items, contacts and the
//! contact ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
-- account_type holds a taxonomy key (cash, bank, inventory, income, ...)
CREATE TABLE accounts (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    code VARCHAR(20),
    account_type VARCHAR(50) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_tenant_code UNIQUE (tenant_id, code)
);

CREATE INDEX idx_accounts_tenant_type ON accounts(tenant_id, account_type);
";

const ITEMS_SQL: &str = r"
CREATE TABLE item_categories (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_item_categories_tenant_name UNIQUE (tenant_id, name)
);

CREATE TABLE items (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    item_type VARCHAR(20) NOT NULL,
    sku VARCHAR(100),
    category_id BIGINT REFERENCES item_categories(id) ON DELETE SET NULL,
    sell_price NUMERIC(19, 4),
    cost_price NUMERIC(19, 4),
    sell_account_id BIGINT REFERENCES accounts(id),
    cost_account_id BIGINT REFERENCES accounts(id),
    inventory_account_id BIGINT REFERENCES accounts(id),
    note TEXT,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_items_tenant_name UNIQUE (tenant_id, name),
    CONSTRAINT chk_items_type CHECK (item_type IN ('service', 'inventory', 'non-inventory')),
    CONSTRAINT chk_items_sell_price CHECK (sell_price IS NULL OR sell_price >= 0),
    CONSTRAINT chk_items_cost_price CHECK (cost_price IS NULL OR cost_price >= 0)
);

CREATE INDEX idx_items_tenant_type ON items(tenant_id, item_type);
CREATE INDEX idx_items_tenant_created ON items(tenant_id, created_at DESC);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    kind VARCHAR(20) NOT NULL,
    display_name VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_contacts_kind CHECK (kind IN ('customer', 'vendor'))
);

CREATE INDEX idx_contacts_tenant_kind ON contacts(tenant_id, kind, display_name);

CREATE TABLE contact_ledger_entries (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    contact_id BIGINT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    entry_date DATE NOT NULL,
    reference_type VARCHAR(50) NOT NULL,
    transaction_number VARCHAR(100),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_contact_ledger_non_negative CHECK (debit >= 0 AND credit >= 0)
);

CREATE INDEX idx_contact_ledger_tenant_date ON contact_ledger_entries(tenant_id, entry_date, id);
CREATE INDEX idx_contact_ledger_contact ON contact_ledger_entries(contact_id, entry_date);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS contact_ledger_entries CASCADE;
DROP TABLE IF EXISTS contacts CASCADE;
DROP TABLE IF EXISTS items CASCADE;
DROP TABLE IF EXISTS item_categories CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;
";
