//! Transactions-by-contact report service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tally_shared::types::{ContactId, TenantId};
use tracing::{debug, info};

use super::aggregate::{aggregate_contacts, apply_display_filters, validate_period};
use super::error::ReportError;
use super::number_format::NumberFormat;
use super::table_rows::{transactions_by_customer_rows, transactions_by_vendor_rows};
use super::types::{
    BalanceTotals, ContactKind, ContactReportQuery, LedgerEntry, ReportContact,
    TransactionsByContactReport,
};

/// Repository trait for contact ledger reads.
///
/// This trait is implemented by the db crate.
pub trait ContactLedgerRepository: Send + Sync {
    /// Contacts of one kind ordered by name; all of them when `ids` is empty.
    fn list_contacts(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        ids: &[ContactId],
    ) -> impl std::future::Future<Output = Result<Vec<ReportContact>, ReportError>> + Send;

    /// Debit and credit sums per contact of entries dated before `before`.
    fn opening_totals(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        before: NaiveDate,
    ) -> impl std::future::Future<Output = Result<HashMap<ContactId, BalanceTotals>, ReportError>>
    + Send;

    /// Entries dated from `from` through `to`.
    fn entries_between(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<LedgerEntry>, ReportError>> + Send;
}

/// Report service for the transactions-by-customers and by-vendors reports.
pub struct ReportService<R: ContactLedgerRepository> {
    repo: Arc<R>,
}

impl<R: ContactLedgerRepository> ReportService<R> {
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Transactions by customers.
    pub async fn transactions_by_customers(
        &self,
        tenant_id: TenantId,
        query: &ContactReportQuery,
        format: &NumberFormat,
    ) -> Result<TransactionsByContactReport, ReportError> {
        self.transactions_by_contact(tenant_id, ContactKind::Customer, query, format)
            .await
    }

    /// Transactions by vendors.
    pub async fn transactions_by_vendors(
        &self,
        tenant_id: TenantId,
        query: &ContactReportQuery,
        format: &NumberFormat,
    ) -> Result<TransactionsByContactReport, ReportError> {
        self.transactions_by_contact(tenant_id, ContactKind::Vendor, query, format)
            .await
    }

    async fn transactions_by_contact(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        query: &ContactReportQuery,
        format: &NumberFormat,
    ) -> Result<TransactionsByContactReport, ReportError> {
        validate_period(query.from_date, query.to_date)?;

        info!(
            tenant_id = %tenant_id,
            kind = kind.as_str(),
            from = %query.from_date,
            to = %query.to_date,
            "Generating transactions by contact report"
        );

        let contacts = self
            .repo
            .list_contacts(tenant_id, kind, &query.contact_ids)
            .await?;
        let opening = self
            .repo
            .opening_totals(tenant_id, kind, query.from_date)
            .await?;
        let entries = self
            .repo
            .entries_between(tenant_id, kind, query.from_date, query.to_date)
            .await?;

        debug!(
            tenant_id = %tenant_id,
            contacts = contacts.len(),
            entries = entries.len(),
            "Loaded contact ledger"
        );

        let sections = aggregate_contacts(
            &contacts,
            &opening,
            &entries,
            query.from_date,
            query.to_date,
            kind.normal_side(),
        );
        let sections = apply_display_filters(sections, query);

        let table = match kind {
            ContactKind::Customer => transactions_by_customer_rows(&sections, format),
            ContactKind::Vendor => transactions_by_vendor_rows(&sections, format),
        };

        Ok(TransactionsByContactReport {
            kind,
            from_date: query.from_date,
            to_date: query.to_date,
            currency: format.currency_code.clone(),
            data: sections,
            table,
        })
    }
}
