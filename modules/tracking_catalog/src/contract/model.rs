//! Contract models for the tracking catalog
//!
//! These models are transport-agnostic and used across the domain, storage
//! and REST layers.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Analytics event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Track,
    Identify,
    Alias,
    Screen,
    Page,
}

impl EventType {
    /// All recognized event types in their canonical order
    pub const ALL: [EventType; 5] = [
        EventType::Track,
        EventType::Identify,
        EventType::Alias,
        EventType::Screen,
        EventType::Page,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Identify => "identify",
            Self::Alias => "alias",
            Self::Screen => "screen",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Property value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    String,
    Number,
    Boolean,
}

impl PropertyType {
    /// All recognized property types in their canonical order
    pub const ALL: [PropertyType; 3] = [
        PropertyType::String,
        PropertyType::Number,
        PropertyType::Boolean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Returned when a string does not name a known event or property type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// Event definition, unique by (name, type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_type: EventType,
    /// Empty string means "no description"
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property definition, unique by (name, type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub property_type: PropertyType,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tracking plan with its full binding graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Event bindings in declaration order
    pub events: Vec<PlanEvent>,
}

/// Binding between a tracking plan and an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEvent {
    pub id: Uuid,
    pub event: Event,
    /// Whether properties outside the declared set are permitted (informational)
    pub additional_properties: bool,
    /// Property bindings in declaration order
    pub properties: Vec<PlanEventProperty>,
}

/// Binding between a plan event and a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEventProperty {
    pub id: Uuid,
    pub property: Property,
    pub required: bool,
}

/// Unvalidated event definition as submitted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub name: String,
    pub event_type: String,
    pub description: String,
}

/// Unvalidated property definition as submitted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyInput {
    pub name: String,
    pub property_type: String,
    pub description: String,
}

/// Validated event definition ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub event_type: EventType,
    pub description: String,
}

/// Validated property definition ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProperty {
    pub name: String,
    pub property_type: PropertyType,
    pub description: String,
}

/// Tracking plan definition used for both create and update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingPlanSpec {
    pub name: String,
    pub description: String,
    pub events: Vec<PlanEventSpec>,
}

/// Event entry of a tracking plan definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanEventSpec {
    pub name: String,
    pub event_type: String,
    pub description: String,
    pub additional_properties: bool,
    pub properties: Vec<PlanPropertySpec>,
}

/// Property entry of a plan event definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanPropertySpec {
    pub name: String,
    pub property_type: String,
    pub required: bool,
    pub description: String,
}

/// Identity attached to a request by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub client_id: String,
}
