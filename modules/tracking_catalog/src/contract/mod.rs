//! Contract layer - transport-agnostic models and errors
//!
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::CatalogError;
pub use model::{
    Event, EventInput, EventType, NewEvent, NewProperty, PlanEvent, PlanEventProperty,
    PlanEventSpec, PlanPropertySpec, Principal, Property, PropertyInput, PropertyType,
    TrackingPlan, TrackingPlanSpec, UnknownKind,
};
