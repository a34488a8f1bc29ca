//! Events table entity

use sea_orm::entity::prelude::*;

/// Event definition, unique by (name, type)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// Event type (track, identify, alias, screen, page)
    pub r#type: String,

    /// Empty string when no description was supplied
    pub description: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Plan bindings referencing this event
    #[sea_orm(has_many = "super::plan_event::Entity")]
    PlanEvents,
}

impl Related<super::plan_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
