//! Campaign entity: a named tracking session

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub created_at: DateTimeUtc,
    /// Monotonically incremented viewer counter
    pub current_views: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::media_log::Entity")]
    MediaLog,
    #[sea_orm(has_many = "super::gps_log::Entity")]
    GpsLog,
    #[sea_orm(has_many = "super::social_link::Entity")]
    SocialLink,
}

impl Related<super::media_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaLog.def()
    }
}

impl Related<super::gps_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GpsLog.def()
    }
}

impl Related<super::social_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
