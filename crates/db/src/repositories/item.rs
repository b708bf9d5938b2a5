//! Item repository for database operations.
//!
//! Implements item persistence using SeaORM. Every query is tenant-filtered.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use tally_core::items::{
    Item, ItemError, ItemFilter, ItemInput, ItemRepository as ItemRepoTrait, ItemSortColumn,
    ItemType, SortOrder,
};
use tally_shared::types::{AccountId, ItemCategoryId, ItemId, TenantId};

use crate::entities::items;

/// Item repository implementation.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ItemRepoTrait for ItemRepository {
    async fn find_by_id(&self, tenant_id: TenantId, id: ItemId) -> Result<Option<Item>, ItemError> {
        let model = items::Entity::find_by_id(id.into_inner())
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn name_exists(
        &self,
        tenant_id: TenantId,
        name: &str,
        exclude: Option<ItemId>,
    ) -> Result<bool, ItemError> {
        let mut query = items::Entity::find()
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(items::Column::Name.eq(name));

        if let Some(id) = exclude {
            query = query.filter(items::Column::Id.ne(id.into_inner()));
        }

        let count = query
            .count(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, tenant_id: TenantId, input: ItemInput) -> Result<Item, ItemError> {
        let now = Utc::now();
        let name = input.name.clone();
        let active_model = items::ActiveModel {
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(input.name),
            item_type: Set(input.item_type.as_str().to_string()),
            sku: Set(input.sku),
            category_id: Set(input.category_id.map(ItemCategoryId::into_inner)),
            sell_price: Set(input.sell_price),
            cost_price: Set(input.cost_price),
            sell_account_id: Set(input.sell_account_id.map(AccountId::into_inner)),
            cost_account_id: Set(input.cost_account_id.map(AccountId::into_inner)),
            inventory_account_id: Set(input.inventory_account_id.map(AccountId::into_inner)),
            note: Set(input.note),
            active: Set(input.active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &name))?;

        to_domain(model)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: ItemId,
        input: ItemInput,
    ) -> Result<Item, ItemError> {
        let model = items::Entity::find_by_id(id.into_inner())
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?
            .ok_or(ItemError::NotFound(id))?;

        let name = input.name.clone();
        let mut active_model: items::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.item_type = Set(input.item_type.as_str().to_string());
        active_model.sku = Set(input.sku);
        active_model.category_id = Set(input.category_id.map(ItemCategoryId::into_inner));
        active_model.sell_price = Set(input.sell_price);
        active_model.cost_price = Set(input.cost_price);
        active_model.sell_account_id = Set(input.sell_account_id.map(AccountId::into_inner));
        active_model.cost_account_id = Set(input.cost_account_id.map(AccountId::into_inner));
        active_model.inventory_account_id =
            Set(input.inventory_account_id.map(AccountId::into_inner));
        active_model.note = Set(input.note);
        active_model.active = Set(input.active);
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, &name))?;

        to_domain(model)
    }

    async fn delete(&self, tenant_id: TenantId, id: ItemId) -> Result<bool, ItemError> {
        let result = items::Entity::delete_many()
            .filter(items::Column::Id.eq(id.into_inner()))
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_existing_ids(
        &self,
        tenant_id: TenantId,
        ids: &[ItemId],
    ) -> Result<Vec<ItemId>, ItemError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let found: Vec<i64> = items::Entity::find()
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(items::Column::Id.is_in(raw))
            .select_only()
            .column(items::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(found.into_iter().map(ItemId::new).collect())
    }

    async fn delete_many(&self, tenant_id: TenantId, ids: &[ItemId]) -> Result<u64, ItemError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let result = items::Entity::delete_many()
            .filter(items::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(items::Column::Id.is_in(raw))
            .exec(&self.db)
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        Ok(result.rows_affected)
    }

    async fn list(
        &self,
        tenant_id: TenantId,
        filter: &ItemFilter,
    ) -> Result<(Vec<Item>, u64), ItemError> {
        let mut query =
            items::Entity::find().filter(items::Column::TenantId.eq(tenant_id.into_inner()));

        if let Some(item_type) = filter.item_type {
            query = query.filter(items::Column::ItemType.eq(item_type.as_str()));
        }

        if let Some(active) = filter.active {
            query = query.filter(items::Column::Active.eq(active));
        }

        if let Some(term) = filter.search_term() {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let lower = |column: items::Column| Expr::expr(Func::lower(Expr::col(column)));
            query = query.filter(
                Condition::any()
                    .add(lower(items::Column::Name).like(pattern.as_str()))
                    .add(lower(items::Column::Sku).like(pattern.as_str())),
            );
        }

        let order = match filter.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let column = match filter.sort_by {
            ItemSortColumn::Name => items::Column::Name,
            ItemSortColumn::Sku => items::Column::Sku,
            ItemSortColumn::SellPrice => items::Column::SellPrice,
            ItemSortColumn::CostPrice => items::Column::CostPrice,
            ItemSortColumn::CreatedAt => items::Column::CreatedAt,
        };
        let query = query
            .order_by(column, order)
            .order_by_asc(items::Column::Id);

        let paginator = query.paginate(&self.db, filter.page.limit());
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;
        let models = paginator
            .fetch_page(u64::from(filter.page.page.saturating_sub(1)))
            .await
            .map_err(|e| ItemError::repository(e.to_string()))?;

        let items = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }
}

/// Escapes `LIKE` wildcards in a search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Maps an insert or update failure. The only unique constraint on items is
/// `uq_items_tenant_name`, so a violation means another write took the name.
fn write_error(err: DbErr, name: &str) -> ItemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ItemError::ItemNameExists(name.to_string()),
        _ => ItemError::repository(err.to_string()),
    }
}

/// Convert database model to domain type.
fn to_domain(model: items::Model) -> Result<Item, ItemError> {
    let item_type = ItemType::parse(&model.item_type).ok_or_else(|| {
        ItemError::repository(format!(
            "item {} has unknown item type '{}'",
            model.id, model.item_type
        ))
    })?;

    Ok(Item {
        id: ItemId::new(model.id),
        tenant_id: TenantId::new(model.tenant_id),
        name: model.name,
        item_type,
        sku: model.sku,
        category_id: model.category_id.map(ItemCategoryId::new),
        sell_price: model.sell_price,
        cost_price: model.cost_price,
        sell_account_id: model.sell_account_id.map(AccountId::new),
        cost_account_id: model.cost_account_id.map(AccountId::new),
        inventory_account_id: model.inventory_account_id.map(AccountId::new),
        note: model.note,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("widget"), "widget");
    }

    #[test]
    fn test_write_error_without_constraint_is_repository_error() {
        let err = write_error(DbErr::Custom("connection reset".to_string()), "Widget");
        assert_eq!(err, ItemError::repository("Custom Error: connection reset"));
    }

    #[test]
    fn test_to_domain_rejects_unknown_item_type() {
        let now = Utc::now();
        let model = items::Model {
            id: 1,
            tenant_id: 1,
            name: "Widget".to_string(),
            item_type: "bundle".to_string(),
            sku: None,
            category_id: None,
            sell_price: None,
            cost_price: None,
            sell_account_id: None,
            cost_account_id: None,
            inventory_account_id: None,
            note: None,
            active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };

        assert!(matches!(to_domain(model), Err(ItemError::Repository(_))));
    }
}
