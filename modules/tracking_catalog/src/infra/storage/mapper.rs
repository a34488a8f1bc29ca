//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{event, plan_event, plan_event_property, property, tracking_plan};
use crate::contract::{
    Event, EventType, NewEvent, NewProperty, PlanEvent, PlanEventProperty, Property,
    PropertyType, TrackingPlan,
};
use crate::domain::repository::{NewPlanEvent, NewPlanEventProperty, PlanRecord};
use anyhow::Context;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

// ===== Event Conversions =====

impl TryFrom<event::Model> for Event {
    type Error = anyhow::Error;

    fn try_from(entity: event::Model) -> Result<Self, Self::Error> {
        let event_type: EventType = entity
            .r#type
            .parse()
            .with_context(|| format!("event {} has corrupt type column", entity.id))?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            event_type,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Event> for event::ActiveModel {
    fn from(model: &Event) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            r#type: Set(model.event_type.as_str().to_string()),
            description: Set(model.description.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

/// Fresh row for a validated event; id and timestamps are assigned here
pub fn new_event_row(new: &NewEvent) -> event::ActiveModel {
    let now = chrono::Utc::now();
    event::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name.clone()),
        r#type: Set(new.event_type.as_str().to_string()),
        description: Set(new.description.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

// ===== Property Conversions =====

impl TryFrom<property::Model> for Property {
    type Error = anyhow::Error;

    fn try_from(entity: property::Model) -> Result<Self, Self::Error> {
        let property_type: PropertyType = entity
            .r#type
            .parse()
            .with_context(|| format!("property {} has corrupt type column", entity.id))?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            property_type,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Property> for property::ActiveModel {
    fn from(model: &Property) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            r#type: Set(model.property_type.as_str().to_string()),
            description: Set(model.description.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

pub fn new_property_row(new: &NewProperty) -> property::ActiveModel {
    let now = chrono::Utc::now();
    property::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name.clone()),
        r#type: Set(new.property_type.as_str().to_string()),
        description: Set(new.description.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

// ===== Tracking Plan Conversions =====

impl From<tracking_plan::Model> for PlanRecord {
    fn from(entity: tracking_plan::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&PlanRecord> for tracking_plan::ActiveModel {
    fn from(model: &PlanRecord) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

impl From<&NewPlanEvent> for plan_event::ActiveModel {
    fn from(binding: &NewPlanEvent) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            tracking_plan_id: Set(binding.tracking_plan_id),
            event_id: Set(binding.event_id),
            additional_properties: Set(binding.additional_properties),
            position: Set(binding.position),
        }
    }
}

impl From<&NewPlanEventProperty> for plan_event_property::ActiveModel {
    fn from(binding: &NewPlanEventProperty) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            plan_event_id: Set(binding.plan_event_id),
            property_id: Set(binding.property_id),
            required: Set(binding.required),
            position: Set(binding.position),
        }
    }
}

/// Assemble a plan from its row and already-converted bindings
pub fn assemble_plan(record: PlanRecord, events: Vec<PlanEvent>) -> TrackingPlan {
    TrackingPlan {
        id: record.id,
        name: record.name,
        description: record.description,
        created_at: record.created_at,
        updated_at: record.updated_at,
        events,
    }
}

pub fn assemble_plan_event(
    row: plan_event::Model,
    event: Event,
    properties: Vec<PlanEventProperty>,
) -> PlanEvent {
    PlanEvent {
        id: row.id,
        event,
        additional_properties: row.additional_properties,
        properties,
    }
}

pub fn assemble_plan_event_property(
    row: plan_event_property::Model,
    property: Property,
) -> PlanEventProperty {
    PlanEventProperty {
        id: row.id,
        property,
        required: row.required,
    }
}
