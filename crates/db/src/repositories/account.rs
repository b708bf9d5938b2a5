//! Account repository for the chart of accounts.
//!
//! Items only read accounts; the stored `account_type` key is resolved
//! against the taxonomy by the item service.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tally_core::items::{AccountRecord, AccountRepository as AccountRepoTrait, ItemError};
use tally_shared::types::{AccountId, TenantId};

use crate::entities::accounts;

/// Account repository implementation.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AccountRepoTrait for AccountRepository {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AccountId,
    ) -> Result<Option<AccountRecord>, ItemError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[AccountId],
    ) -> Result<Vec<AccountRecord>, ItemError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let models = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(accounts::Column::Id.is_in(raw))
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

fn to_domain(model: accounts::Model) -> AccountRecord {
    AccountRecord {
        id: AccountId::new(model.id),
        name: model.name,
        code: model.code,
        account_type: model.account_type,
        active: model.active,
    }
}
