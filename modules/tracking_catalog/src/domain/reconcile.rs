//! Find-or-create of events and properties during plan composition
//!
//! Resolution runs inside the caller's unit of work: a row created here is
//! only durable once the caller commits, and disappears on rollback.

use super::repository::{StorageError, UnitOfWork};
use super::validation::{parse_event_type, parse_property_type};
use crate::contract::{CatalogError, Event, NewEvent, NewProperty, Property};

/// Why a resolution failed
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Terminal failure, surfaced to the caller as is
    #[error("{0}")]
    Rejected(CatalogError),

    /// Another transaction created the same natural key between our lookup
    /// and our insert. The enclosing composition may be retried.
    #[error("{entity} '{name}' ({kind}) was created by a concurrent request")]
    Raced {
        entity: &'static str,
        name: String,
        kind: &'static str,
    },
}

impl From<CatalogError> for ReconcileError {
    fn from(err: CatalogError) -> Self {
        Self::Rejected(err)
    }
}

impl From<ReconcileError> for CatalogError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Rejected(err) => err,
            raced @ ReconcileError::Raced { .. } => CatalogError::conflict(raced.to_string()),
        }
    }
}

/// An empty supplied description is "no opinion" and never conflicts
fn ensure_compatible_description(
    entity: &str,
    name: &str,
    kind: &str,
    stored: &str,
    supplied: &str,
) -> Result<(), ReconcileError> {
    if !stored.is_empty() && !supplied.is_empty() && stored != supplied {
        tracing::warn!(entity, name, kind, "description conflict during reconciliation");
        return Err(CatalogError::conflict(format!(
            "{} '{}' ({}) exists with different description: stored '{}', supplied '{}'",
            entity, name, kind, stored, supplied
        ))
        .into());
    }
    Ok(())
}

/// Resolve an event by (name, type), creating it when absent
pub async fn resolve_event(
    uow: &mut dyn UnitOfWork,
    name: &str,
    event_type: &str,
    description: &str,
) -> Result<Event, ReconcileError> {
    let event_type = parse_event_type("event type", event_type)?;

    let existing = uow
        .find_event(name, event_type)
        .await
        .map_err(|e| e.into_internal("find event"))?;

    if let Some(event) = existing {
        ensure_compatible_description(
            "event",
            name,
            event_type.as_str(),
            &event.description,
            description,
        )?;
        return Ok(event);
    }

    let new_event = NewEvent {
        name: name.to_string(),
        event_type,
        description: description.to_string(),
    };

    match uow.insert_event(&new_event).await {
        Ok(event) => {
            tracing::debug!(event_id = %event.id, name, kind = %event_type, "created event");
            Ok(event)
        }
        Err(StorageError::UniqueViolation(_)) => Err(ReconcileError::Raced {
            entity: "event",
            name: name.to_string(),
            kind: event_type.as_str(),
        }),
        Err(e) => Err(e.into_internal("insert event").into()),
    }
}

/// Resolve a property by (name, type), creating it when absent
pub async fn resolve_property(
    uow: &mut dyn UnitOfWork,
    name: &str,
    property_type: &str,
    description: &str,
) -> Result<Property, ReconcileError> {
    let property_type = parse_property_type("property type", property_type)?;

    let existing = uow
        .find_property(name, property_type)
        .await
        .map_err(|e| e.into_internal("find property"))?;

    if let Some(property) = existing {
        ensure_compatible_description(
            "property",
            name,
            property_type.as_str(),
            &property.description,
            description,
        )?;
        return Ok(property);
    }

    let new_property = NewProperty {
        name: name.to_string(),
        property_type,
        description: description.to_string(),
    };

    match uow.insert_property(&new_property).await {
        Ok(property) => {
            tracing::debug!(property_id = %property.id, name, kind = %property_type, "created property");
            Ok(property)
        }
        Err(StorageError::UniqueViolation(_)) => Err(ReconcileError::Raced {
            entity: "property",
            name: name.to_string(),
            kind: property_type.as_str(),
        }),
        Err(e) => Err(e.into_internal("insert property").into()),
    }
}
