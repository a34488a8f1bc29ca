//! SeaORM repository implementations

use crate::contract::{
    Event, EventType, NewEvent, NewProperty, PlanEvent, PlanEventProperty, Property, PropertyType,
    TrackingPlan,
};
use crate::domain::repository::{
    EventRepository, PlanRecord, PropertyRepository, StorageError, StorageResult,
    TrackingPlanRepository,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{event, plan_event, plan_event_property, property, tracking_plan};
use super::mapper::{
    assemble_plan, assemble_plan_event, assemble_plan_event_property, new_event_row,
    new_property_row,
};

impl From<DbErr> for StorageError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StorageError::UniqueViolation(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                StorageError::ForeignKeyViolation(detail)
            }
            _ => StorageError::Backend(err.into()),
        }
    }
}

// ===== Shared queries =====

pub(crate) async fn find_event_by_key<C: ConnectionTrait>(
    db: &C,
    name: &str,
    event_type: EventType,
) -> StorageResult<Option<Event>> {
    let row = event::Entity::find()
        .filter(event::Column::Name.eq(name))
        .filter(event::Column::Type.eq(event_type.as_str()))
        .one(db)
        .await?;

    Ok(row.map(Event::try_from).transpose()?)
}

pub(crate) async fn find_property_by_key<C: ConnectionTrait>(
    db: &C,
    name: &str,
    property_type: PropertyType,
) -> StorageResult<Option<Property>> {
    let row = property::Entity::find()
        .filter(property::Column::Name.eq(name))
        .filter(property::Column::Type.eq(property_type.as_str()))
        .one(db)
        .await?;

    Ok(row.map(Property::try_from).transpose()?)
}

pub(crate) async fn plan_event_ids<C: ConnectionTrait>(
    db: &C,
    tracking_plan_id: Uuid,
) -> StorageResult<Vec<Uuid>> {
    let ids = plan_event::Entity::find()
        .select_only()
        .column(plan_event::Column::Id)
        .filter(plan_event::Column::TrackingPlanId.eq(tracking_plan_id))
        .into_tuple::<Uuid>()
        .all(db)
        .await?;
    Ok(ids)
}

/// Delete every plan-event of a plan together with its property bindings
pub(crate) async fn delete_plan_events<C: ConnectionTrait>(
    db: &C,
    tracking_plan_id: Uuid,
) -> StorageResult<u64> {
    let ids = plan_event_ids(db, tracking_plan_id).await?;
    if ids.is_empty() {
        return Ok(0);
    }

    plan_event_property::Entity::delete_many()
        .filter(plan_event_property::Column::PlanEventId.is_in(ids.clone()))
        .exec(db)
        .await?;

    let removed = plan_event::Entity::delete_many()
        .filter(plan_event::Column::Id.is_in(ids))
        .exec(db)
        .await?;

    Ok(removed.rows_affected)
}

/// Load the binding graph of the given plan rows, preserving row order
async fn load_graph<C: ConnectionTrait>(
    db: &C,
    rows: Vec<tracking_plan::Model>,
) -> StorageResult<Vec<TrackingPlan>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let plan_ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
    let plan_events = plan_event::Entity::find()
        .filter(plan_event::Column::TrackingPlanId.is_in(plan_ids))
        .order_by_asc(plan_event::Column::Position)
        .all(db)
        .await?;

    let plan_event_ids: Vec<Uuid> = plan_events.iter().map(|pe| pe.id).collect();
    let bindings = if plan_event_ids.is_empty() {
        Vec::new()
    } else {
        plan_event_property::Entity::find()
            .filter(plan_event_property::Column::PlanEventId.is_in(plan_event_ids))
            .order_by_asc(plan_event_property::Column::Position)
            .all(db)
            .await?
    };

    let mut event_ids: Vec<Uuid> = plan_events.iter().map(|pe| pe.event_id).collect();
    event_ids.sort_unstable();
    event_ids.dedup();
    let mut events: HashMap<Uuid, Event> = HashMap::new();
    if !event_ids.is_empty() {
        for row in event::Entity::find()
            .filter(event::Column::Id.is_in(event_ids))
            .all(db)
            .await?
        {
            let event = Event::try_from(row)?;
            events.insert(event.id, event);
        }
    }

    let mut property_ids: Vec<Uuid> = bindings.iter().map(|b| b.property_id).collect();
    property_ids.sort_unstable();
    property_ids.dedup();
    let mut properties: HashMap<Uuid, Property> = HashMap::new();
    if !property_ids.is_empty() {
        for row in property::Entity::find()
            .filter(property::Column::Id.is_in(property_ids))
            .all(db)
            .await?
        {
            let property = Property::try_from(row)?;
            properties.insert(property.id, property);
        }
    }

    let mut properties_by_plan_event: HashMap<Uuid, Vec<PlanEventProperty>> = HashMap::new();
    for binding in bindings {
        let property = properties.get(&binding.property_id).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "plan event property {} references missing property {}",
                binding.id,
                binding.property_id
            )
        })?;
        properties_by_plan_event
            .entry(binding.plan_event_id)
            .or_default()
            .push(assemble_plan_event_property(binding, property));
    }

    let mut events_by_plan: HashMap<Uuid, Vec<PlanEvent>> = HashMap::new();
    for row in plan_events {
        let event = events.get(&row.event_id).cloned().ok_or_else(|| {
            anyhow::anyhow!("plan event {} references missing event {}", row.id, row.event_id)
        })?;
        let props = properties_by_plan_event.remove(&row.id).unwrap_or_default();
        events_by_plan
            .entry(row.tracking_plan_id)
            .or_default()
            .push(assemble_plan_event(row, event, props));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let bound = events_by_plan.remove(&row.id).unwrap_or_default();
            assemble_plan(PlanRecord::from(row), bound)
        })
        .collect())
}

// ===== Event Repository =====

pub struct SeaOrmEventRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEventRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn create(&self, new: &NewEvent) -> StorageResult<Event> {
        let row = new_event_row(new).insert(&*self.db).await?;
        Ok(Event::try_from(row)?)
    }

    async fn list_all(&self) -> StorageResult<Vec<Event>> {
        let rows = event::Entity::find()
            .order_by_asc(event::Column::Name)
            .order_by_asc(event::Column::Type)
            .all(&*self.db)
            .await?;

        rows.into_iter()
            .map(|row| Event::try_from(row).map_err(StorageError::from))
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Event>> {
        let row = event::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Event::try_from).transpose()?)
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        event_type: EventType,
    ) -> StorageResult<Option<Event>> {
        find_event_by_key(&*self.db, name, event_type).await
    }

    async fn update(&self, event: &Event) -> StorageResult<Event> {
        let active: event::ActiveModel = event.into();
        let row = event::Entity::update(active).exec(&*self.db).await?;
        Ok(Event::try_from(row)?)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let result = event::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64> {
        let count = plan_event::Entity::find()
            .filter(plan_event::Column::EventId.eq(id))
            .count(&*self.db)
            .await?;
        Ok(count)
    }
}

// ===== Property Repository =====

pub struct SeaOrmPropertyRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPropertyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertyRepository for SeaOrmPropertyRepository {
    async fn create(&self, new: &NewProperty) -> StorageResult<Property> {
        let row = new_property_row(new).insert(&*self.db).await?;
        Ok(Property::try_from(row)?)
    }

    async fn list_all(&self) -> StorageResult<Vec<Property>> {
        let rows = property::Entity::find()
            .order_by_asc(property::Column::Name)
            .order_by_asc(property::Column::Type)
            .all(&*self.db)
            .await?;

        rows.into_iter()
            .map(|row| Property::try_from(row).map_err(StorageError::from))
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Property>> {
        let row = property::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Property::try_from).transpose()?)
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>> {
        find_property_by_key(&*self.db, name, property_type).await
    }

    async fn update(&self, property: &Property) -> StorageResult<Property> {
        let active: property::ActiveModel = property.into();
        let row = property::Entity::update(active).exec(&*self.db).await?;
        Ok(Property::try_from(row)?)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let result = property::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64> {
        let count = plan_event_property::Entity::find()
            .filter(plan_event_property::Column::PropertyId.eq(id))
            .count(&*self.db)
            .await?;
        Ok(count)
    }
}

// ===== Tracking Plan Repository =====

pub struct SeaOrmTrackingPlanRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTrackingPlanRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrackingPlanRepository for SeaOrmTrackingPlanRepository {
    async fn list_all(&self) -> StorageResult<Vec<TrackingPlan>> {
        let rows = tracking_plan::Entity::find()
            .order_by_asc(tracking_plan::Column::CreatedAt)
            .order_by_asc(tracking_plan::Column::Name)
            .all(&*self.db)
            .await?;

        load_graph(&*self.db, rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<TrackingPlan>> {
        let Some(row) = tracking_plan::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };
        Ok(load_graph(&*self.db, vec![row]).await?.into_iter().next())
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Option<TrackingPlan>> {
        let Some(row) = tracking_plan::Entity::find()
            .filter(tracking_plan::Column::Name.eq(name))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };
        Ok(load_graph(&*self.db, vec![row]).await?.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let txn = self.db.begin().await?;

        let bindings = delete_plan_events(&txn, id).await?;
        let result = tracking_plan::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::debug!(plan_id = %id, bindings, "tracking plan rows deleted");
        Ok(result.rows_affected > 0)
    }
}
