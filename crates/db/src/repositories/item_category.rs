//! Item category repository.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tally_core::items::{ItemCategory, ItemCategoryRepository as CategoryRepoTrait, ItemError};
use tally_shared::types::{ItemCategoryId, TenantId};

use crate::entities::item_categories;

/// Item category repository implementation.
#[derive(Debug, Clone)]
pub struct ItemCategoryRepository {
    db: DatabaseConnection,
}

impl ItemCategoryRepository {
    /// Create a new item category repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl CategoryRepoTrait for ItemCategoryRepository {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ItemCategoryId,
    ) -> Result<Option<ItemCategory>, ItemError> {
        let model = item_categories::Entity::find_by_id(id.into_inner())
            .filter(item_categories::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemCategoryId],
    ) -> Result<Vec<ItemCategory>, ItemError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let models = item_categories::Entity::find()
            .filter(item_categories::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(item_categories::Column::Id.is_in(raw))
            .order_by_asc(item_categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

fn to_domain(model: item_categories::Model) -> ItemCategory {
    ItemCategory {
        id: ItemCategoryId::new(model.id),
        name: model.name,
        description: model.description,
    }
}
