//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs and
//! infra/storage/unit_of_work.rs

use crate::contract::{
    CatalogError, Event, EventType, NewEvent, NewProperty, Property, PropertyType, TrackingPlan,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Errors surfaced by storage implementations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A unique index rejected the write
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key still references the row being removed
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other store or driver failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Log the failure and collapse it into an opaque internal error
    pub fn into_internal(self, operation: &str) -> CatalogError {
        tracing::error!(error = %self, operation, "storage operation failed");
        CatalogError::Internal
    }
}

/// Tracking plan row without its bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plan-event binding to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanEvent {
    pub tracking_plan_id: Uuid,
    pub event_id: Uuid,
    pub additional_properties: bool,
    pub position: i32,
}

/// Plan-event-property binding to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanEventProperty {
    pub plan_event_id: Uuid,
    pub property_id: Uuid,
    pub required: bool,
    pub position: i32,
}

/// Repository for event definitions
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event
    async fn create(&self, event: &NewEvent) -> StorageResult<Event>;

    /// List all events
    async fn list_all(&self) -> StorageResult<Vec<Event>>;

    /// Find an event by id
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Event>>;

    /// Find an event by its (name, type) natural key
    async fn find_by_natural_key(
        &self,
        name: &str,
        event_type: EventType,
    ) -> StorageResult<Option<Event>>;

    /// Overwrite every column of an existing event
    async fn update(&self, event: &Event) -> StorageResult<Event>;

    /// Delete an event, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> StorageResult<bool>;

    /// Number of plan bindings referencing the event
    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64>;
}

/// Repository for property definitions
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Create a new property
    async fn create(&self, property: &NewProperty) -> StorageResult<Property>;

    /// List all properties
    async fn list_all(&self) -> StorageResult<Vec<Property>>;

    /// Find a property by id
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Property>>;

    /// Find a property by its (name, type) natural key
    async fn find_by_natural_key(
        &self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>>;

    /// Overwrite every column of an existing property
    async fn update(&self, property: &Property) -> StorageResult<Property>;

    /// Delete a property, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> StorageResult<bool>;

    /// Number of plan bindings referencing the property
    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64>;
}

/// Repository for tracking plans
///
/// Reads eagerly load the full graph: plan, plan events with their event,
/// plan event properties with their property, all in declaration order.
#[async_trait]
pub trait TrackingPlanRepository: Send + Sync {
    /// List all tracking plans with their bindings
    async fn list_all(&self) -> StorageResult<Vec<TrackingPlan>>;

    /// Find a tracking plan with its bindings
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<TrackingPlan>>;

    /// Find a tracking plan by its unique name
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<TrackingPlan>>;

    /// Delete a plan and its bindings, returning whether the plan existed
    async fn delete(&self, id: Uuid) -> StorageResult<bool>;
}

/// One atomic scope over the catalog store
///
/// Writes become durable only on [`UnitOfWork::commit`]. Dropping a unit of
/// work without committing rolls it back.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_event(&mut self, name: &str, event_type: EventType)
        -> StorageResult<Option<Event>>;

    async fn insert_event(&mut self, event: &NewEvent) -> StorageResult<Event>;

    async fn find_property(
        &mut self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>>;

    async fn insert_property(&mut self, property: &NewProperty) -> StorageResult<Property>;

    async fn insert_plan(&mut self, name: &str, description: &str) -> StorageResult<PlanRecord>;

    async fn find_plan(&mut self, id: Uuid) -> StorageResult<Option<PlanRecord>>;

    async fn update_plan(&mut self, plan: &PlanRecord) -> StorageResult<PlanRecord>;

    /// Remove every plan-event (and its plan-event-properties) of a plan
    async fn clear_plan_events(&mut self, tracking_plan_id: Uuid) -> StorageResult<u64>;

    async fn insert_plan_event(&mut self, binding: &NewPlanEvent) -> StorageResult<Uuid>;

    async fn insert_plan_event_property(
        &mut self,
        binding: &NewPlanEventProperty,
    ) -> StorageResult<Uuid>;

    async fn commit(self: Box<Self>) -> StorageResult<()>;

    async fn rollback(self: Box<Self>) -> StorageResult<()>;
}

/// Opens units of work against the catalog store
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>>;
}
