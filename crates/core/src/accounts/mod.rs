//! Account type taxonomy.
//!
//! A static reference table describing every account type a tenant's chart
//! of accounts may use: its normal balance side, parent and root
//! classification, and whether it appears on the balance sheet or the
//! income statement.

pub mod error;
pub mod taxonomy;

pub use error::TaxonomyError;
pub use taxonomy::{
    ACCOUNT_TYPES, AccountType, AccountTypeKey, NormalSide, ParentType, RootType, all,
    balance_sheet_types, by_root_type, income_sheet_types, lookup,
};
