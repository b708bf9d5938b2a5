//! `SeaORM` Entity for items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    /// `service`, `inventory` or `non-inventory`.
    pub item_type: String,
    pub sku: Option<String>,
    pub category_id: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub sell_price: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub cost_price: Option<Decimal>,
    pub sell_account_id: Option<i64>,
    pub cost_account_id: Option<i64>,
    pub inventory_account_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenants,
    #[sea_orm(
        belongs_to = "super::item_categories::Entity",
        from = "Column::CategoryId",
        to = "super::item_categories::Column::Id"
    )]
    ItemCategories,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::SellAccountId",
        to = "super::accounts::Column::Id"
    )]
    SellAccount,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::CostAccountId",
        to = "super::accounts::Column::Id"
    )]
    CostAccount,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::InventoryAccountId",
        to = "super::accounts::Column::Id"
    )]
    InventoryAccount,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::item_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
