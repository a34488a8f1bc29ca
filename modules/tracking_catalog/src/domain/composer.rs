//! Tracking plan composition
//!
//! Builds or fully replaces the plan → plan-event → plan-event-property graph
//! inside a single unit of work. Either the whole graph commits or nothing
//! does.

use super::reconcile::{resolve_event, resolve_property, ReconcileError};
use super::repository::{
    NewPlanEvent, NewPlanEventProperty, StorageError, TrackingPlanRepository, TransactionManager,
    UnitOfWork,
};
use super::validation::{position, validate_plan_spec};
use crate::contract::{CatalogError, PlanEventSpec, TrackingPlan, TrackingPlanSpec};
use std::sync::Arc;
use uuid::Uuid;

/// Composes tracking plans atomically
pub struct TrackingPlanComposer {
    plans: Arc<dyn TrackingPlanRepository>,
    tx_manager: Arc<dyn TransactionManager>,
    /// How many times a composition that lost a creation race is replayed
    race_retries: u32,
}

impl TrackingPlanComposer {
    pub fn new(
        plans: Arc<dyn TrackingPlanRepository>,
        tx_manager: Arc<dyn TransactionManager>,
        race_retries: u32,
    ) -> Self {
        Self {
            plans,
            tx_manager,
            race_retries,
        }
    }

    /// Create a tracking plan and its full binding graph
    pub async fn create_plan(&self, spec: &TrackingPlanSpec) -> Result<TrackingPlan, CatalogError> {
        validate_plan_spec(spec)?;

        let mut attempt = 0;
        let plan_id = loop {
            match self.try_create(spec).await {
                Ok(id) => break id,
                Err(err @ ReconcileError::Raced { .. }) if attempt < self.race_retries => {
                    attempt += 1;
                    tracing::warn!(plan = %spec.name, attempt, reason = %err, "retrying plan creation");
                }
                Err(err) => return Err(err.into()),
            }
        };

        tracing::info!(plan_id = %plan_id, plan = %spec.name, events = spec.events.len(), "tracking plan created");
        self.reload(plan_id).await
    }

    /// Replace a tracking plan's attributes and rebuild its bindings from scratch
    pub async fn update_plan(
        &self,
        id: Uuid,
        spec: &TrackingPlanSpec,
    ) -> Result<TrackingPlan, CatalogError> {
        validate_plan_spec(spec)?;

        let mut attempt = 0;
        loop {
            match self.try_update(id, spec).await {
                Ok(()) => break,
                Err(err @ ReconcileError::Raced { .. }) if attempt < self.race_retries => {
                    attempt += 1;
                    tracing::warn!(plan_id = %id, attempt, reason = %err, "retrying plan update");
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(plan_id = %id, plan = %spec.name, events = spec.events.len(), "tracking plan rebuilt");
        self.reload(id).await
    }

    async fn try_create(&self, spec: &TrackingPlanSpec) -> Result<Uuid, ReconcileError> {
        let mut uow = self.begin().await?;
        let outcome = Self::build(uow.as_mut(), spec).await;
        Self::finish(uow, outcome).await
    }

    async fn try_update(&self, id: Uuid, spec: &TrackingPlanSpec) -> Result<(), ReconcileError> {
        let mut uow = self.begin().await?;
        let outcome = Self::rebuild(uow.as_mut(), id, spec).await;
        Self::finish(uow, outcome).await
    }

    async fn build(uow: &mut dyn UnitOfWork, spec: &TrackingPlanSpec) -> Result<Uuid, ReconcileError> {
        let plan = match uow.insert_plan(&spec.name, &spec.description).await {
            Ok(plan) => plan,
            Err(StorageError::UniqueViolation(_)) => {
                return Err(CatalogError::conflict(format!(
                    "tracking plan '{}' already exists",
                    spec.name
                ))
                .into())
            }
            Err(e) => return Err(e.into_internal("insert tracking plan").into()),
        };

        Self::bind_events(uow, plan.id, &spec.events).await?;
        Ok(plan.id)
    }

    async fn rebuild(
        uow: &mut dyn UnitOfWork,
        id: Uuid,
        spec: &TrackingPlanSpec,
    ) -> Result<(), ReconcileError> {
        let mut plan = uow
            .find_plan(id)
            .await
            .map_err(|e| e.into_internal("find tracking plan"))?
            .ok_or_else(|| CatalogError::not_found("tracking plan", id))?;

        plan.name = spec.name.clone();
        plan.description = spec.description.clone();
        plan.updated_at = chrono::Utc::now();

        match uow.update_plan(&plan).await {
            Ok(_) => {}
            Err(StorageError::UniqueViolation(_)) => {
                return Err(CatalogError::conflict(format!(
                    "tracking plan '{}' already exists",
                    spec.name
                ))
                .into())
            }
            Err(e) => return Err(e.into_internal("update tracking plan").into()),
        }

        let removed = uow
            .clear_plan_events(id)
            .await
            .map_err(|e| e.into_internal("clear plan events"))?;
        tracing::debug!(plan_id = %id, removed, "discarded previous bindings");

        Self::bind_events(uow, id, &spec.events).await
    }

    /// Resolve and link every event and property in declaration order
    async fn bind_events(
        uow: &mut dyn UnitOfWork,
        tracking_plan_id: Uuid,
        events: &[PlanEventSpec],
    ) -> Result<(), ReconcileError> {
        for (event_pos, event_spec) in events.iter().enumerate() {
            let event_position = position("events", event_pos)?;
            let event = resolve_event(
                uow,
                &event_spec.name,
                &event_spec.event_type,
                &event_spec.description,
            )
            .await?;

            let plan_event_id = uow
                .insert_plan_event(&NewPlanEvent {
                    tracking_plan_id,
                    event_id: event.id,
                    additional_properties: event_spec.additional_properties,
                    position: event_position,
                })
                .await
                .map_err(|e| e.into_internal("insert plan event"))?;

            for (property_pos, property_spec) in event_spec.properties.iter().enumerate() {
                let property_position =
                    position(&format!("events[{}].properties", event_pos), property_pos)?;
                let property = resolve_property(
                    uow,
                    &property_spec.name,
                    &property_spec.property_type,
                    &property_spec.description,
                )
                .await?;

                uow.insert_plan_event_property(&NewPlanEventProperty {
                    plan_event_id,
                    property_id: property.id,
                    required: property_spec.required,
                    position: property_position,
                })
                .await
                .map_err(|e| e.into_internal("insert plan event property"))?;
            }
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ReconcileError> {
        self.tx_manager
            .begin()
            .await
            .map_err(|e| e.into_internal("begin transaction").into())
    }

    /// Commit on success, roll back explicitly on failure
    async fn finish<T>(
        uow: Box<dyn UnitOfWork>,
        outcome: Result<T, ReconcileError>,
    ) -> Result<T, ReconcileError> {
        match outcome {
            Ok(value) => {
                uow.commit()
                    .await
                    .map_err(|e| e.into_internal("commit transaction"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn reload(&self, id: Uuid) -> Result<TrackingPlan, CatalogError> {
        self.plans
            .find_by_id(id)
            .await
            .map_err(|e| e.into_internal("reload tracking plan"))?
            .ok_or_else(|| {
                tracing::error!(plan_id = %id, "tracking plan missing after commit");
                CatalogError::Internal
            })
    }
}
