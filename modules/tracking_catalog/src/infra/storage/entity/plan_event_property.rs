//! Plan-event-property bindings table entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "plan_event_properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub plan_event_id: Uuid,

    pub property_id: Uuid,

    pub required: bool,

    /// Declaration order within the plan event
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_event::Entity",
        from = "Column::PlanEventId",
        to = "super::plan_event::Column::Id",
        on_delete = "Cascade"
    )]
    PlanEvent,

    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Restrict"
    )]
    Property,
}

impl Related<super::plan_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEvent.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
