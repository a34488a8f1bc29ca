//! Tracking plans table entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tracking_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    pub description: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owned event bindings (cascade on delete)
    #[sea_orm(has_many = "super::plan_event::Entity")]
    PlanEvents,
}

impl Related<super::plan_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
