//! Properties table entity

use sea_orm::entity::prelude::*;

/// Property definition, unique by (name, type)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// Property type (string, number, boolean)
    pub r#type: String,

    pub description: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plan_event_property::Entity")]
    PlanEventProperties,
}

impl Related<super::plan_event_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEventProperties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
