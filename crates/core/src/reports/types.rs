//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{ContactId, LedgerEntryId};

use crate::accounts::NormalSide;

/// Which side of the ledger a contact report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// Customers (receivables).
    Customer,
    /// Vendors (payables).
    Vendor,
}

impl ContactKind {
    /// Customers carry receivables (debit-normal), vendors payables (credit-normal).
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Customer => NormalSide::Debit,
            Self::Vendor => NormalSide::Credit,
        }
    }

    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }
}

/// A contact a report is run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContact {
    /// Contact ID.
    pub id: ContactId,
    /// Display name.
    pub name: String,
}

/// One raw ledger movement against a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry ID, the tie-breaker for same-day entries.
    pub id: LedgerEntryId,
    /// Contact the entry belongs to.
    pub contact_id: ContactId,
    /// Posting date.
    pub date: NaiveDate,
    /// Name of the account posted to.
    pub account_name: String,
    /// Source document type, e.g. `SaleInvoice`.
    pub reference_type: String,
    /// Source document number.
    pub transaction_number: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl LedgerEntry {
    /// Amount by which this entry moves a balance on the given side.
    #[must_use]
    pub fn signed_amount(&self, side: NormalSide) -> Decimal {
        BalanceTotals {
            debit: self.debit,
            credit: self.credit,
        }
        .signed(side)
    }
}

/// Debit and credit sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Total debit.
    pub debit: Decimal,
    /// Total credit.
    pub credit: Decimal,
}

impl BalanceTotals {
    /// Net balance as seen from the given normal side.
    #[must_use]
    pub fn signed(&self, side: NormalSide) -> Decimal {
        match side {
            NormalSide::Debit => self.debit - self.credit,
            NormalSide::Credit => self.credit - self.debit,
        }
    }
}

/// A ledger movement with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTransaction {
    /// Posting date.
    pub date: NaiveDate,
    /// Name of the account posted to.
    pub account_name: String,
    /// Source document type.
    pub reference_type: String,
    /// Source document number.
    pub transaction_number: Option<String>,
    /// Credit amount.
    pub credit: Decimal,
    /// Debit amount.
    pub debit: Decimal,
    /// Balance after this movement.
    pub running_balance: Decimal,
}

/// A contact's activity over the report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSection {
    /// Contact ID.
    pub contact_id: ContactId,
    /// Display name.
    pub contact_name: String,
    /// Balance before the period.
    pub opening_balance: Decimal,
    /// Movements in the period, chronological.
    pub transactions: Vec<ContactTransaction>,
    /// Balance at the end of the period.
    pub closing_balance: Decimal,
}

/// Parameters of a transactions-by-contact report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReportQuery {
    /// First day of the period.
    pub from_date: NaiveDate,
    /// Last day of the period, inclusive.
    pub to_date: NaiveDate,
    /// Restrict to these contacts; empty means all.
    #[serde(default)]
    pub contact_ids: Vec<ContactId>,
    /// Skip contacts with no activity and zero balances.
    #[serde(default)]
    pub none_zero: bool,
    /// Skip contacts without transactions in the period.
    #[serde(default)]
    pub none_transactions: bool,
}

/// Row classification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowType {
    /// Opening balance row.
    OpeningBalance,
    /// Closing balance row.
    ClosingBalance,
    /// Ledger movement row.
    Transaction,
    /// Customer section row.
    Customer,
    /// Vendor section row.
    Vendor,
}

/// One formatted cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Column key.
    pub key: String,
    /// Formatted value.
    pub value: String,
}

impl TableCell {
    /// Create a cell.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A placeholder cell that keeps columns aligned.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("empty", "")
    }
}

/// A presentation row with ordered cells and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Classification tags.
    pub row_types: Vec<RowType>,
    /// Cells in column order.
    pub cells: Vec<TableCell>,
    /// Child rows in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TableRow>,
}

impl TableRow {
    /// Create a leaf row.
    #[must_use]
    pub fn leaf(row_type: RowType, cells: Vec<TableCell>) -> Self {
        Self {
            row_types: vec![row_type],
            cells,
            children: Vec::new(),
        }
    }

    /// Primary row type.
    #[must_use]
    pub fn row_type(&self) -> Option<RowType> {
        self.row_types.first().copied()
    }

    /// Value of the first cell with the given key.
    #[must_use]
    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }
}

/// A generated transactions-by-contact report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsByContactReport {
    /// Contact side.
    pub kind: ContactKind,
    /// First day of the period.
    pub from_date: NaiveDate,
    /// Last day of the period.
    pub to_date: NaiveDate,
    /// Currency shown in amounts.
    pub currency: Option<String>,
    /// Per-contact aggregates.
    pub data: Vec<ContactSection>,
    /// Row tree for table rendering.
    pub table: Vec<TableRow>,
}
