//! Transactions-by-contact reports.
//!
//! This module turns a tenant's contact ledger into report data:
//! - Aggregation: opening balance, chronological transactions with running
//!   balance, closing balance per contact
//! - Row tree: contact section rows with opening / transaction / closing children
//! - Amount formatting for cells

pub mod aggregate;
pub mod error;
pub mod number_format;
pub mod service;
pub mod table_rows;
pub mod types;


pub use error::ReportError;
pub use number_format::{NegativeFormat, NumberFormat};
pub use service::{ContactLedgerRepository, ReportService};
pub use table_rows::{
    transactions_by_contact_rows, transactions_by_customer_rows, transactions_by_vendor_rows,
};
pub use types::*;
