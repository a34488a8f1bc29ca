//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Event DTOs =====

/// Event definition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: Uuid,

    #[schema(example = "Order Completed")]
    pub name: String,

    /// One of track, identify, alias, screen, page
    #[serde(rename = "type")]
    #[schema(example = "track")]
    pub event_type: String,

    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Create or replace an event
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    #[schema(example = "track")]
    pub event_type: String,

    #[serde(default)]
    pub description: String,
}

// ===== Property DTOs =====

/// Property definition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
    pub id: Uuid,

    #[schema(example = "price")]
    pub name: String,

    /// One of string, number, boolean
    #[serde(rename = "type")]
    #[schema(example = "number")]
    pub property_type: String,

    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Create or replace a property
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    #[schema(example = "number")]
    pub property_type: String,

    #[serde(default)]
    pub description: String,
}

// ===== Tracking Plan DTOs =====

/// Tracking plan with its nested bindings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingPlanDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub events: Vec<PlanEventDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanEventDto {
    /// Binding id
    pub id: Uuid,
    pub additional_properties: bool,
    pub event: EventDto,
    pub properties: Vec<PlanEventPropertyDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanEventPropertyDto {
    /// Binding id
    pub id: Uuid,
    pub required: bool,
    pub property: PropertyDto,
}

/// Tracking plan definition used for both create and update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingPlanRequest {
    #[serde(default)]
    #[schema(example = "Checkout")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub events: Vec<PlanEventRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanEventRequest {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub event_type: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub additional_properties: bool,

    #[serde(default)]
    pub properties: Vec<PlanPropertyRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPropertyRequest {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub property_type: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: String,
}

// ===== Misc =====

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    #[schema(example = "ok")]
    pub status: String,
}
