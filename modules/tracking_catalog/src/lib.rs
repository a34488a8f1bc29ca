//! Tracking Catalog Module
//!
//! Catalog of analytics event and property definitions, and tracking plans
//! that compose them. Plans are reconciled against the shared catalog
//! atomically: events and properties are deduplicated by (name, type).

// Public exports
pub mod contract;
pub use contract::{
    CatalogError, Event, EventType, PlanEvent, PlanEventProperty, Principal, Property,
    PropertyType, TrackingPlan, TrackingPlanSpec,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::CatalogModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
