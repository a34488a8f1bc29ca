//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

// ===== Event conversions =====

impl From<contract::Event> for EventDto {
    fn from(event: contract::Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            event_type: event.event_type.to_string(),
            description: event.description,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventRequest> for contract::EventInput {
    fn from(req: EventRequest) -> Self {
        Self {
            name: req.name,
            event_type: req.event_type,
            description: req.description,
        }
    }
}

// ===== Property conversions =====

impl From<contract::Property> for PropertyDto {
    fn from(property: contract::Property) -> Self {
        Self {
            id: property.id,
            name: property.name,
            property_type: property.property_type.to_string(),
            description: property.description,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

impl From<PropertyRequest> for contract::PropertyInput {
    fn from(req: PropertyRequest) -> Self {
        Self {
            name: req.name,
            property_type: req.property_type,
            description: req.description,
        }
    }
}

// ===== Tracking plan conversions =====

impl From<contract::TrackingPlan> for TrackingPlanDto {
    fn from(plan: contract::TrackingPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
            events: plan.events.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::PlanEvent> for PlanEventDto {
    fn from(binding: contract::PlanEvent) -> Self {
        Self {
            id: binding.id,
            additional_properties: binding.additional_properties,
            event: binding.event.into(),
            properties: binding.properties.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::PlanEventProperty> for PlanEventPropertyDto {
    fn from(binding: contract::PlanEventProperty) -> Self {
        Self {
            id: binding.id,
            required: binding.required,
            property: binding.property.into(),
        }
    }
}

impl From<TrackingPlanRequest> for contract::TrackingPlanSpec {
    fn from(req: TrackingPlanRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            events: req.events.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PlanEventRequest> for contract::PlanEventSpec {
    fn from(req: PlanEventRequest) -> Self {
        Self {
            name: req.name,
            event_type: req.event_type,
            description: req.description,
            additional_properties: req.additional_properties,
            properties: req.properties.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PlanPropertyRequest> for contract::PlanPropertySpec {
    fn from(req: PlanPropertyRequest) -> Self {
        Self {
            name: req.name,
            property_type: req.property_type,
            required: req.required,
            description: req.description,
        }
    }
}
