//! Domain service - business logic orchestration

use super::composer::TrackingPlanComposer;
use super::repository::{
    EventRepository, PropertyRepository, StorageError, TrackingPlanRepository, TransactionManager,
};
use super::validation::{validate_event_input, validate_property_input};
use crate::contract::{
    CatalogError, Event, EventInput, Property, PropertyInput, TrackingPlan, TrackingPlanSpec,
};
use std::sync::Arc;
use uuid::Uuid;

/// Domain service for the tracking catalog
pub struct Service {
    event_repo: Arc<dyn EventRepository>,
    property_repo: Arc<dyn PropertyRepository>,
    plan_repo: Arc<dyn TrackingPlanRepository>,
    composer: TrackingPlanComposer,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        property_repo: Arc<dyn PropertyRepository>,
        plan_repo: Arc<dyn TrackingPlanRepository>,
        tx_manager: Arc<dyn TransactionManager>,
        race_retries: u32,
    ) -> Self {
        let composer = TrackingPlanComposer::new(plan_repo.clone(), tx_manager, race_retries);
        Self {
            event_repo,
            property_repo,
            plan_repo,
            composer,
        }
    }

    // ===== Event Operations =====

    /// Create a standalone event
    pub async fn create_event(&self, input: EventInput) -> Result<Event, CatalogError> {
        let new_event = validate_event_input(&input)?;

        let event = self.event_repo.create(&new_event).await.map_err(|e| match e {
            StorageError::UniqueViolation(_) => CatalogError::conflict(format!(
                "event '{}' ({}) already exists",
                new_event.name, new_event.event_type
            )),
            other => other.into_internal("create event"),
        })?;

        tracing::info!(event_id = %event.id, name = %event.name, kind = %event.event_type, "event created");
        Ok(event)
    }

    /// List all events
    pub async fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        self.event_repo
            .list_all()
            .await
            .map_err(|e| e.into_internal("list events"))
    }

    /// Get an event by id
    pub async fn get_event(&self, id: Uuid) -> Result<Event, CatalogError> {
        self.event_repo
            .find_by_id(id)
            .await
            .map_err(|e| e.into_internal("get event"))?
            .ok_or_else(|| CatalogError::not_found("event", id))
    }

    /// Overwrite an event's name, type and description
    pub async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, CatalogError> {
        let new_event = validate_event_input(&input)?;
        let mut event = self.get_event(id).await?;

        event.name = new_event.name;
        event.event_type = new_event.event_type;
        event.description = new_event.description;
        event.updated_at = chrono::Utc::now();

        let event = self.event_repo.update(&event).await.map_err(|e| match e {
            StorageError::UniqueViolation(_) => CatalogError::conflict(format!(
                "event '{}' ({}) already exists",
                event.name, event.event_type
            )),
            other => other.into_internal("update event"),
        })?;

        tracing::info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    /// Delete an event that no tracking plan references
    pub async fn delete_event(&self, id: Uuid) -> Result<(), CatalogError> {
        let bindings = self
            .event_repo
            .count_bindings(id)
            .await
            .map_err(|e| e.into_internal("count event bindings"))?;
        if bindings > 0 {
            return Err(CatalogError::conflict(format!(
                "event {} is referenced by {} tracking plan binding(s)",
                id, bindings
            )));
        }

        let removed = self
            .event_repo
            .delete(id)
            .await
            .map_err(|e| match e {
                StorageError::ForeignKeyViolation(_) => {
                    tracing::warn!(event_id = %id, "event bound by a plan after the reference check");
                    CatalogError::conflict(format!(
                        "event {} is referenced by a tracking plan binding",
                        id
                    ))
                }
                other => other.into_internal("delete event"),
            })?;
        if !removed {
            return Err(CatalogError::not_found("event", id));
        }

        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }

    // ===== Property Operations =====

    /// Create a standalone property
    pub async fn create_property(&self, input: PropertyInput) -> Result<Property, CatalogError> {
        let new_property = validate_property_input(&input)?;

        let property = self
            .property_repo
            .create(&new_property)
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation(_) => CatalogError::conflict(format!(
                    "property '{}' ({}) already exists",
                    new_property.name, new_property.property_type
                )),
                other => other.into_internal("create property"),
            })?;

        tracing::info!(property_id = %property.id, name = %property.name, kind = %property.property_type, "property created");
        Ok(property)
    }

    /// List all properties
    pub async fn list_properties(&self) -> Result<Vec<Property>, CatalogError> {
        self.property_repo
            .list_all()
            .await
            .map_err(|e| e.into_internal("list properties"))
    }

    /// Get a property by id
    pub async fn get_property(&self, id: Uuid) -> Result<Property, CatalogError> {
        self.property_repo
            .find_by_id(id)
            .await
            .map_err(|e| e.into_internal("get property"))?
            .ok_or_else(|| CatalogError::not_found("property", id))
    }

    /// Overwrite a property's name, type and description
    pub async fn update_property(
        &self,
        id: Uuid,
        input: PropertyInput,
    ) -> Result<Property, CatalogError> {
        let new_property = validate_property_input(&input)?;
        let mut property = self.get_property(id).await?;

        property.name = new_property.name;
        property.property_type = new_property.property_type;
        property.description = new_property.description;
        property.updated_at = chrono::Utc::now();

        let property = self
            .property_repo
            .update(&property)
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation(_) => CatalogError::conflict(format!(
                    "property '{}' ({}) already exists",
                    property.name, property.property_type
                )),
                other => other.into_internal("update property"),
            })?;

        tracing::info!(property_id = %property.id, "property updated");
        Ok(property)
    }

    /// Delete a property that no tracking plan references
    pub async fn delete_property(&self, id: Uuid) -> Result<(), CatalogError> {
        let bindings = self
            .property_repo
            .count_bindings(id)
            .await
            .map_err(|e| e.into_internal("count property bindings"))?;
        if bindings > 0 {
            return Err(CatalogError::conflict(format!(
                "property {} is referenced by {} tracking plan binding(s)",
                id, bindings
            )));
        }

        let removed = self
            .property_repo
            .delete(id)
            .await
            .map_err(|e| match e {
                StorageError::ForeignKeyViolation(_) => {
                    tracing::warn!(property_id = %id, "property bound by a plan after the reference check");
                    CatalogError::conflict(format!(
                        "property {} is referenced by a tracking plan binding",
                        id
                    ))
                }
                other => other.into_internal("delete property"),
            })?;
        if !removed {
            return Err(CatalogError::not_found("property", id));
        }

        tracing::info!(property_id = %id, "property deleted");
        Ok(())
    }

    // ===== Tracking Plan Operations =====

    /// Create a tracking plan with all its bindings
    pub async fn create_plan(&self, spec: TrackingPlanSpec) -> Result<TrackingPlan, CatalogError> {
        self.composer.create_plan(&spec).await
    }

    /// Replace a tracking plan and rebuild its bindings
    pub async fn update_plan(
        &self,
        id: Uuid,
        spec: TrackingPlanSpec,
    ) -> Result<TrackingPlan, CatalogError> {
        self.composer.update_plan(id, &spec).await
    }

    /// List all tracking plans with their bindings
    pub async fn list_plans(&self) -> Result<Vec<TrackingPlan>, CatalogError> {
        self.plan_repo
            .list_all()
            .await
            .map_err(|e| e.into_internal("list tracking plans"))
    }

    /// Get a tracking plan with its bindings
    pub async fn get_plan(&self, id: Uuid) -> Result<TrackingPlan, CatalogError> {
        self.plan_repo
            .find_by_id(id)
            .await
            .map_err(|e| e.into_internal("get tracking plan"))?
            .ok_or_else(|| CatalogError::not_found("tracking plan", id))
    }

    /// Delete a tracking plan; shared events and properties are kept
    pub async fn delete_plan(&self, id: Uuid) -> Result<(), CatalogError> {
        let removed = self
            .plan_repo
            .delete(id)
            .await
            .map_err(|e| e.into_internal("delete tracking plan"))?;
        if !removed {
            return Err(CatalogError::not_found("tracking plan", id));
        }

        tracing::info!(plan_id = %id, "tracking plan deleted");
        Ok(())
    }
}
