//! Contact ledger repository for the transactions-by-contact reports.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tally_core::reports::{
    BalanceTotals, ContactKind, ContactLedgerRepository as LedgerRepoTrait, LedgerEntry,
    ReportContact, ReportError,
};
use tally_shared::types::{ContactId, LedgerEntryId, TenantId};

use crate::entities::{accounts, contact_ledger_entries, contacts};

/// Contact ledger repository implementation.
#[derive(Debug, Clone)]
pub struct ContactLedgerRepository {
    db: DatabaseConnection,
}

impl ContactLedgerRepository {
    /// Create a new contact ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// IDs of all contacts of one kind.
    async fn contact_ids(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
    ) -> Result<Vec<i64>, ReportError> {
        contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(contacts::Column::Kind.eq(kind.as_str()))
            .select_only()
            .column(contacts::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ReportError::repository(e.to_string()))
    }
}

impl LedgerRepoTrait for ContactLedgerRepository {
    async fn list_contacts(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        ids: &[ContactId],
    ) -> Result<Vec<ReportContact>, ReportError> {
        let mut query = contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(contacts::Column::Kind.eq(kind.as_str()));

        if !ids.is_empty() {
            let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
            query = query.filter(contacts::Column::Id.is_in(raw));
        }

        let models = query
            .order_by_asc(contacts::Column::DisplayName)
            .order_by_asc(contacts::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ReportError::repository(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ReportContact {
                id: ContactId::new(m.id),
                name: m.display_name,
            })
            .collect())
    }

    async fn opening_totals(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        before: NaiveDate,
    ) -> Result<HashMap<ContactId, BalanceTotals>, ReportError> {
        let contact_ids = self.contact_ids(tenant_id, kind).await?;
        if contact_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, Decimal, Decimal)> = contact_ledger_entries::Entity::find()
            .filter(contact_ledger_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(contact_ledger_entries::Column::ContactId.is_in(contact_ids))
            .filter(contact_ledger_entries::Column::EntryDate.lt(before))
            .select_only()
            .column(contact_ledger_entries::Column::ContactId)
            .column(contact_ledger_entries::Column::Debit)
            .column(contact_ledger_entries::Column::Credit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ReportError::repository(e.to_string()))?;

        let mut totals: HashMap<ContactId, BalanceTotals> = HashMap::new();
        for (contact_id, debit, credit) in rows {
            let entry = totals.entry(ContactId::new(contact_id)).or_default();
            entry.debit += debit;
            entry.credit += credit;
        }
        Ok(totals)
    }

    async fn entries_between(
        &self,
        tenant_id: TenantId,
        kind: ContactKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, ReportError> {
        let contact_ids = self.contact_ids(tenant_id, kind).await?;
        if contact_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = contact_ledger_entries::Entity::find()
            .filter(contact_ledger_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(contact_ledger_entries::Column::ContactId.is_in(contact_ids))
            .filter(contact_ledger_entries::Column::EntryDate.gte(from))
            .filter(contact_ledger_entries::Column::EntryDate.lte(to))
            .order_by_asc(contact_ledger_entries::Column::EntryDate)
            .order_by_asc(contact_ledger_entries::Column::Id)
            .find_also_related(accounts::Entity)
            .all(&self.db)
            .await
            .map_err(|e| ReportError::repository(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(entry, account)| LedgerEntry {
                id: LedgerEntryId::new(entry.id),
                contact_id: ContactId::new(entry.contact_id),
                date: entry.entry_date,
                account_name: account.map(|a| a.name).unwrap_or_default(),
                reference_type: entry.reference_type,
                transaction_number: entry.transaction_number,
                debit: entry.debit,
                credit: entry.credit,
            })
            .collect())
    }
}
