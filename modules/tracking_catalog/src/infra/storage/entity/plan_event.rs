//! Plan-event bindings table entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "plan_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tracking_plan_id: Uuid,

    pub event_id: Uuid,

    /// Whether undeclared properties are permitted at ingestion time
    pub additional_properties: bool,

    /// Declaration order within the plan
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tracking_plan::Entity",
        from = "Column::TrackingPlanId",
        to = "super::tracking_plan::Column::Id",
        on_delete = "Cascade"
    )]
    TrackingPlan,

    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Restrict"
    )]
    Event,

    #[sea_orm(has_many = "super::plan_event_property::Entity")]
    PlanEventProperties,
}

impl Related<super::tracking_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingPlan.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::plan_event_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEventProperties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
