//! Row tree for the transactions-by-contact reports.
//!
//! Each contact becomes one section row whose children are, in order, the
//! opening balance row, one row per transaction and the closing balance row.
//! The customer and vendor reports differ only in the subject column and the
//! section row type.

use rust_decimal::Decimal;

use super::number_format::NumberFormat;
use super::types::{ContactSection, ContactTransaction, RowType, TableCell, TableRow};

/// Date format of transaction rows, e.g. `2024 Jan 05`.
pub const DATE_FORMAT: &str = "%Y %b %d";

/// Label of the opening balance row.
pub const OPENING_BALANCE_LABEL: &str = "Opening balance";

/// Label of the closing balance row.
pub const CLOSING_BALANCE_LABEL: &str = "Closing balance";

/// Columns between the balance label and the balance value.
const BALANCE_ROW_GAP: usize = 5;

/// Builds the opening balance row.
#[must_use]
pub fn opening_balance_row(contact: &ContactSection, format: &NumberFormat) -> TableRow {
    balance_row(
        RowType::OpeningBalance,
        ("openingBalanceLabel", OPENING_BALANCE_LABEL),
        "openingBalanceValue",
        contact.opening_balance,
        format,
    )
}

/// Builds the closing balance row.
#[must_use]
pub fn closing_balance_row(contact: &ContactSection, format: &NumberFormat) -> TableRow {
    balance_row(
        RowType::ClosingBalance,
        ("closingBalanceLabel", CLOSING_BALANCE_LABEL),
        "closingBalanceValue",
        contact.closing_balance,
        format,
    )
}

fn balance_row(
    row_type: RowType,
    (label_key, label): (&str, &str),
    value_key: &str,
    amount: Decimal,
    format: &NumberFormat,
) -> TableRow {
    let mut cells = Vec::with_capacity(BALANCE_ROW_GAP + 2);
    cells.push(TableCell::new(label_key, label));
    cells.extend(std::iter::repeat_with(TableCell::empty).take(BALANCE_ROW_GAP));
    cells.push(TableCell::new(value_key, format.format(amount)));
    TableRow::leaf(row_type, cells)
}

/// Builds one transaction row.
#[must_use]
pub fn transaction_row(transaction: &ContactTransaction, format: &NumberFormat) -> TableRow {
    TableRow::leaf(
        RowType::Transaction,
        vec![
            TableCell::new("date", transaction.date.format(DATE_FORMAT).to_string()),
            TableCell::new("account", transaction.account_name.as_str()),
            TableCell::new("referenceType", transaction.reference_type.as_str()),
            TableCell::new(
                "transactionNumber",
                transaction.transaction_number.as_deref().unwrap_or_default(),
            ),
            TableCell::new("credit", format.format(transaction.credit)),
            TableCell::new("debit", format.format(transaction.debit)),
            TableCell::new("runningBalance", format.format(transaction.running_balance)),
        ],
    )
}

/// Builds one section row per contact, in input order.
///
/// `subject` supplies the section's own cells (the contact name column).
pub fn transactions_by_contact_rows<F>(
    contacts: &[ContactSection],
    format: &NumberFormat,
    section_type: RowType,
    subject: F,
) -> Vec<TableRow>
where
    F: Fn(&ContactSection) -> Vec<TableCell>,
{
    contacts
        .iter()
        .map(|contact| {
            let mut children = Vec::with_capacity(contact.transactions.len() + 2);
            children.push(opening_balance_row(contact, format));
            children.extend(
                contact
                    .transactions
                    .iter()
                    .map(|t| transaction_row(t, format)),
            );
            children.push(closing_balance_row(contact, format));

            TableRow {
                row_types: vec![section_type],
                cells: subject(contact),
                children,
            }
        })
        .collect()
}

/// Rows of the transactions-by-customers report.
#[must_use]
pub fn transactions_by_customer_rows(
    customers: &[ContactSection],
    format: &NumberFormat,
) -> Vec<TableRow> {
    transactions_by_contact_rows(customers, format, RowType::Customer, |c| {
        vec![TableCell::new("customerName", c.contact_name.as_str())]
    })
}

/// Rows of the transactions-by-vendors report.
#[must_use]
pub fn transactions_by_vendor_rows(
    vendors: &[ContactSection],
    format: &NumberFormat,
) -> Vec<TableRow> {
    transactions_by_contact_rows(vendors, format, RowType::Vendor, |c| {
        vec![TableCell::new("vendorName", c.contact_name.as_str())]
    })
}
