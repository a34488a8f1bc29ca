//! Structural validation of incoming definitions
//!
//! Pure functions, no I/O. Every violation is reported as
//! `CatalogError::InvalidInput` so nothing reaches the store.

use crate::contract::{
    CatalogError, EventInput, EventType, NewEvent, NewProperty, PropertyInput, PropertyType,
    TrackingPlanSpec,
};
use uuid::Uuid;

fn event_type_list() -> String {
    EventType::ALL.map(EventType::as_str).join(", ")
}

fn property_type_list() -> String {
    PropertyType::ALL.map(PropertyType::as_str).join(", ")
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse an event type, naming the offending field on failure
pub fn parse_event_type(field: &str, value: &str) -> Result<EventType, CatalogError> {
    if is_blank(value) {
        return Err(CatalogError::invalid(format!("{} is required", field)));
    }
    value.parse().map_err(|_| {
        CatalogError::invalid(format!(
            "{} '{}' is invalid. Must be one of: {}",
            field,
            value,
            event_type_list()
        ))
    })
}

/// Parse a property type, naming the offending field on failure
pub fn parse_property_type(field: &str, value: &str) -> Result<PropertyType, CatalogError> {
    if is_blank(value) {
        return Err(CatalogError::invalid(format!("{} is required", field)));
    }
    value.parse().map_err(|_| {
        CatalogError::invalid(format!(
            "{} '{}' is invalid. Must be one of: {}",
            field,
            value,
            property_type_list()
        ))
    })
}

/// Validate a standalone event definition
pub fn validate_event_input(input: &EventInput) -> Result<NewEvent, CatalogError> {
    if is_blank(&input.name) {
        return Err(CatalogError::invalid("name is required"));
    }
    let event_type = parse_event_type("type", &input.event_type)?;

    Ok(NewEvent {
        name: input.name.clone(),
        event_type,
        description: input.description.clone(),
    })
}

/// Validate a standalone property definition
pub fn validate_property_input(input: &PropertyInput) -> Result<NewProperty, CatalogError> {
    if is_blank(&input.name) {
        return Err(CatalogError::invalid("name is required"));
    }
    let property_type = parse_property_type("type", &input.property_type)?;

    Ok(NewProperty {
        name: input.name.clone(),
        property_type,
        description: input.description.clone(),
    })
}

/// Validate a tracking plan definition before any transaction is opened
///
/// Offending array indices are embedded in the message, e.g.
/// `events[2].properties[0].type 'currency' is invalid`.
pub fn validate_plan_spec(spec: &TrackingPlanSpec) -> Result<(), CatalogError> {
    if is_blank(&spec.name) {
        return Err(CatalogError::invalid("name is required"));
    }
    if spec.events.is_empty() {
        return Err(CatalogError::invalid(
            "events is required and cannot be empty",
        ));
    }

    for (i, event) in spec.events.iter().enumerate() {
        if is_blank(&event.name) {
            return Err(CatalogError::invalid(format!("events[{}].name is required", i)));
        }
        parse_event_type(&format!("events[{}].type", i), &event.event_type)?;

        for (j, property) in event.properties.iter().enumerate() {
            if is_blank(&property.name) {
                return Err(CatalogError::invalid(format!(
                    "events[{}].properties[{}].name is required",
                    i, j
                )));
            }
            parse_property_type(
                &format!("events[{}].properties[{}].type", i, j),
                &property.property_type,
            )?;
        }
    }

    Ok(())
}

/// Declaration index as a stored position
pub fn position(field: &str, index: usize) -> Result<i32, CatalogError> {
    i32::try_from(index).map_err(|_| {
        CatalogError::invalid(format!(
            "{} exceeds the maximum of {} entries",
            field,
            i32::MAX
        ))
    })
}

/// Parse a path identifier
pub fn parse_id(raw: &str) -> Result<Uuid, CatalogError> {
    if is_blank(raw) {
        return Err(CatalogError::invalid("id parameter is required"));
    }
    Uuid::parse_str(raw.trim()).map_err(|_| CatalogError::invalid(format!("invalid id format: '{}'", raw)))
}
