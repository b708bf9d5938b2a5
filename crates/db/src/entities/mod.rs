//! `SeaORM` entity definitions.

pub mod accounts;
pub mod contact_ledger_entries;
pub mod contacts;
pub mod item_categories;
pub mod items;
pub mod tenants;
