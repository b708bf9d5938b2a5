//! Repository implementations for data access.
//!
//! Each repository implements a persistence trait declared in `tally-core`,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod contact_ledger;
pub mod item;
pub mod item_category;

pub use account::AccountRepository;
pub use contact_ledger::ContactLedgerRepository;
pub use item::ItemRepository;
pub use item_category::ItemCategoryRepository;
