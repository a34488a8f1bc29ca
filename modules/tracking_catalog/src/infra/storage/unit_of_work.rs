//! Transaction-scoped unit of work over SeaORM

use crate::contract::{Event, EventType, NewEvent, NewProperty, Property, PropertyType};
use crate::domain::repository::{
    NewPlanEvent, NewPlanEventProperty, PlanRecord, StorageResult, TransactionManager, UnitOfWork,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait,
};
use sea_orm::ActiveValue::Set;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{plan_event, plan_event_property, tracking_plan};
use super::mapper::{new_event_row, new_property_row};
use super::repositories::{delete_plan_events, find_event_by_key, find_property_by_key};

/// Unit of work backed by one database transaction
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    tx: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn find_event(
        &mut self,
        name: &str,
        event_type: EventType,
    ) -> StorageResult<Option<Event>> {
        find_event_by_key(&self.tx, name, event_type).await
    }

    async fn insert_event(&mut self, event: &NewEvent) -> StorageResult<Event> {
        let row = new_event_row(event).insert(&self.tx).await?;
        Ok(Event::try_from(row)?)
    }

    async fn find_property(
        &mut self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>> {
        find_property_by_key(&self.tx, name, property_type).await
    }

    async fn insert_property(&mut self, property: &NewProperty) -> StorageResult<Property> {
        let row = new_property_row(property).insert(&self.tx).await?;
        Ok(Property::try_from(row)?)
    }

    async fn insert_plan(&mut self, name: &str, description: &str) -> StorageResult<PlanRecord> {
        let now = chrono::Utc::now();
        let row = tracking_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.tx)
        .await?;
        Ok(row.into())
    }

    async fn find_plan(&mut self, id: Uuid) -> StorageResult<Option<PlanRecord>> {
        let row = tracking_plan::Entity::find_by_id(id).one(&self.tx).await?;
        Ok(row.map(PlanRecord::from))
    }

    async fn update_plan(&mut self, plan: &PlanRecord) -> StorageResult<PlanRecord> {
        let active: tracking_plan::ActiveModel = plan.into();
        let row = tracking_plan::Entity::update(active).exec(&self.tx).await?;
        Ok(row.into())
    }

    async fn clear_plan_events(&mut self, tracking_plan_id: Uuid) -> StorageResult<u64> {
        delete_plan_events(&self.tx, tracking_plan_id).await
    }

    async fn insert_plan_event(&mut self, binding: &NewPlanEvent) -> StorageResult<Uuid> {
        let row = plan_event::ActiveModel::from(binding).insert(&self.tx).await?;
        Ok(row.id)
    }

    async fn insert_plan_event_property(
        &mut self,
        binding: &NewPlanEventProperty,
    ) -> StorageResult<Uuid> {
        let row = plan_event_property::ActiveModel::from(binding)
            .insert(&self.tx)
            .await?;
        Ok(row.id)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let Self { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        let Self { tx } = *self;
        tx.rollback().await?;
        Ok(())
    }
}

/// Opens a fresh transaction per unit of work
pub struct SeaOrmTransactionManager {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTransactionManager {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionManager for SeaOrmTransactionManager {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(SeaOrmUnitOfWork { tx }))
    }
}
