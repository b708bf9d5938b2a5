//! Per-contact aggregation of ledger entries.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::ContactId;

use super::error::ReportError;
use super::types::{
    BalanceTotals, ContactReportQuery, ContactSection, ContactTransaction, LedgerEntry,
    ReportContact,
};
use crate::accounts::NormalSide;

/// Checks that the period is not inverted.
pub fn validate_period(from_date: NaiveDate, to_date: NaiveDate) -> Result<(), ReportError> {
    if from_date > to_date {
        return Err(ReportError::InvalidDateRange {
            start: from_date,
            end: to_date,
        });
    }
    Ok(())
}

/// Builds one section per contact, in contact order.
///
/// - Opening balance: `opening_totals` for the contact plus any entry dated
///   before `from_date`
/// - Transactions: entries from `from_date` through `to_date`, by date then id
/// - Closing balance: opening plus the net movement of the period
///
/// Entries after `to_date` or for unknown contacts are ignored.
#[must_use]
pub fn aggregate_contacts(
    contacts: &[ReportContact],
    opening_totals: &HashMap<ContactId, BalanceTotals>,
    entries: &[LedgerEntry],
    from_date: NaiveDate,
    to_date: NaiveDate,
    side: NormalSide,
) -> Vec<ContactSection> {
    let mut by_contact: HashMap<ContactId, Vec<&LedgerEntry>> = HashMap::new();
    for entry in entries {
        by_contact.entry(entry.contact_id).or_default().push(entry);
    }

    contacts
        .iter()
        .map(|contact| {
            let mut opening = opening_totals
                .get(&contact.id)
                .map_or(Decimal::ZERO, |t| t.signed(side));

            let mut in_period = Vec::new();
            for entry in by_contact.remove(&contact.id).unwrap_or_default() {
                if entry.date < from_date {
                    opening += entry.signed_amount(side);
                } else if entry.date <= to_date {
                    in_period.push(entry);
                }
            }
            in_period.sort_by_key(|e| (e.date, e.id));

            let mut running = opening;
            let transactions = in_period
                .into_iter()
                .map(|entry| {
                    running += entry.signed_amount(side);
                    ContactTransaction {
                        date: entry.date,
                        account_name: entry.account_name.clone(),
                        reference_type: entry.reference_type.clone(),
                        transaction_number: entry.transaction_number.clone(),
                        credit: entry.credit,
                        debit: entry.debit,
                        running_balance: running,
                    }
                })
                .collect();

            ContactSection {
                contact_id: contact.id,
                contact_name: contact.name.clone(),
                opening_balance: opening,
                transactions,
                closing_balance: running,
            }
        })
        .collect()
}

/// Drops sections the query asks to hide.
#[must_use]
pub fn apply_display_filters(
    sections: Vec<ContactSection>,
    query: &ContactReportQuery,
) -> Vec<ContactSection> {
    sections
        .into_iter()
        .filter(|s| !query.none_transactions || !s.transactions.is_empty())
        .filter(|s| {
            !query.none_zero
                || !s.transactions.is_empty()
                || !s.opening_balance.is_zero()
                || !s.closing_balance.is_zero()
        })
        .collect()
}
