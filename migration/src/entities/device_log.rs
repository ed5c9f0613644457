//! Device log entity: parsed viewer device/browser details

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "device_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub device_details: String,
    pub browser_details: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
