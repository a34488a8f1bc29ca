//! SeaORM entities for catalog tables

pub mod event;
pub mod plan_event;
pub mod plan_event_property;
pub mod property;
pub mod tracking_plan;
