//! Shared test doubles and fixtures
//!
//! `MemoryCatalog` is an in-memory catalog store implementing every
//! repository trait plus the transaction manager. A unit of work operates on
//! a snapshot of the committed state and publishes it on commit; unique
//! checks on insert also consult the committed state, like a real unique
//! index would.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracking_catalog::contract::*;
use tracking_catalog::domain::repository::{
    EventRepository, NewPlanEvent, NewPlanEventProperty, PlanRecord, PropertyRepository,
    StorageError, StorageResult, TrackingPlanRepository, TransactionManager, UnitOfWork,
};
use tracking_catalog::domain::Service;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PlanEventRow {
    pub id: Uuid,
    pub tracking_plan_id: Uuid,
    pub event_id: Uuid,
    pub additional_properties: bool,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct PlanEventPropertyRow {
    pub id: Uuid,
    pub plan_event_id: Uuid,
    pub property_id: Uuid,
    pub required: bool,
    pub position: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub events: Vec<Event>,
    pub properties: Vec<Property>,
    pub plans: Vec<PlanRecord>,
    pub plan_events: Vec<PlanEventRow>,
    pub plan_event_properties: Vec<PlanEventPropertyRow>,
}

impl Store {
    fn event_key_taken(&self, name: &str, event_type: EventType, except: Option<Uuid>) -> bool {
        self.events
            .iter()
            .any(|e| e.name == name && e.event_type == event_type && Some(e.id) != except)
    }

    fn property_key_taken(
        &self,
        name: &str,
        property_type: PropertyType,
        except: Option<Uuid>,
    ) -> bool {
        self.properties
            .iter()
            .any(|p| p.name == name && p.property_type == property_type && Some(p.id) != except)
    }

    fn plan_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.plans
            .iter()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn remove_plan_events(&mut self, tracking_plan_id: Uuid) -> u64 {
        let doomed: Vec<Uuid> = self
            .plan_events
            .iter()
            .filter(|pe| pe.tracking_plan_id == tracking_plan_id)
            .map(|pe| pe.id)
            .collect();
        self.plan_event_properties
            .retain(|pep| !doomed.contains(&pep.plan_event_id));
        self.plan_events
            .retain(|pe| pe.tracking_plan_id != tracking_plan_id);
        doomed.len() as u64
    }

    fn assemble(&self, record: &PlanRecord) -> StorageResult<TrackingPlan> {
        let mut rows: Vec<&PlanEventRow> = self
            .plan_events
            .iter()
            .filter(|pe| pe.tracking_plan_id == record.id)
            .collect();
        rows.sort_by_key(|pe| pe.position);

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let event = self
                .events
                .iter()
                .find(|e| e.id == row.event_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("dangling event {}", row.event_id))?;

            let mut bindings: Vec<&PlanEventPropertyRow> = self
                .plan_event_properties
                .iter()
                .filter(|pep| pep.plan_event_id == row.id)
                .collect();
            bindings.sort_by_key(|pep| pep.position);

            let mut properties = Vec::with_capacity(bindings.len());
            for binding in bindings {
                let property = self
                    .properties
                    .iter()
                    .find(|p| p.id == binding.property_id)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("dangling property {}", binding.property_id))?;
                properties.push(PlanEventProperty {
                    id: binding.id,
                    property,
                    required: binding.required,
                });
            }

            events.push(PlanEvent {
                id: row.id,
                event,
                additional_properties: row.additional_properties,
                properties,
            });
        }

        Ok(TrackingPlan {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            events,
        })
    }
}

/// Row created by a concurrent request right before our insert
#[derive(Debug, Clone)]
pub enum Interloper {
    Event(Event),
    Property(Property),
}

/// In-memory catalog store
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    committed: Arc<RwLock<Store>>,
    begins: Arc<AtomicUsize>,
    interloper: Arc<Mutex<Option<Interloper>>>,
    stale_binding_counts: Arc<AtomicBool>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Store {
        self.committed.read().clone()
    }

    pub fn begin_count(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// The next insert of a matching natural key loses a race against `row`
    pub fn race_next_insert(&self, row: Interloper) {
        *self.interloper.lock() = Some(row);
    }

    /// Binding counts report zero, as if a plan bound the row right after the check
    pub fn stale_binding_counts(&self) {
        self.stale_binding_counts.store(true, Ordering::SeqCst);
    }

    fn counts_are_stale(&self) -> bool {
        self.stale_binding_counts.load(Ordering::SeqCst)
    }

    pub fn seed_event(&self, name: &str, event_type: EventType, description: &str) -> Event {
        let now = chrono::Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: name.to_string(),
            event_type,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.committed.write().events.push(event.clone());
        event
    }

    pub fn seed_property(
        &self,
        name: &str,
        property_type: PropertyType,
        description: &str,
    ) -> Property {
        let now = chrono::Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: name.to_string(),
            property_type,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.committed.write().properties.push(property.clone());
        property
    }

    /// Domain service wired entirely to this store
    pub fn service(&self, race_retries: u32) -> Service {
        let this = Arc::new(self.clone());
        Service::new(this.clone(), this.clone(), this.clone(), this, race_retries)
    }

    /// Publish the interloper, if it targets this natural key
    fn take_interloper(&self, name: &str, kind: &str) -> bool {
        let mut slot = self.interloper.lock();
        let matches = match slot.as_ref() {
            Some(Interloper::Event(e)) => e.name == name && e.event_type.as_str() == kind,
            Some(Interloper::Property(p)) => p.name == name && p.property_type.as_str() == kind,
            None => false,
        };
        if !matches {
            return false;
        }
        match slot.take() {
            Some(Interloper::Event(e)) => self.committed.write().events.push(e),
            Some(Interloper::Property(p)) => self.committed.write().properties.push(p),
            None => {}
        }
        true
    }
}

#[async_trait]
impl EventRepository for MemoryCatalog {
    async fn create(&self, new: &NewEvent) -> StorageResult<Event> {
        let mut store = self.committed.write();
        if store.event_key_taken(&new.name, new.event_type, None) {
            return Err(StorageError::UniqueViolation("events(name, type)".into()));
        }
        let now = chrono::Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            event_type: new.event_type,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        store.events.push(event.clone());
        Ok(event)
    }

    async fn list_all(&self) -> StorageResult<Vec<Event>> {
        Ok(self.committed.read().events.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Event>> {
        Ok(self.committed.read().events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        event_type: EventType,
    ) -> StorageResult<Option<Event>> {
        Ok(self
            .committed
            .read()
            .events
            .iter()
            .find(|e| e.name == name && e.event_type == event_type)
            .cloned())
    }

    async fn update(&self, event: &Event) -> StorageResult<Event> {
        let mut store = self.committed.write();
        if store.event_key_taken(&event.name, event.event_type, Some(event.id)) {
            return Err(StorageError::UniqueViolation("events(name, type)".into()));
        }
        let slot = store
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| anyhow::anyhow!("event {} vanished", event.id))?;
        *slot = event.clone();
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let mut store = self.committed.write();
        if store.plan_events.iter().any(|pe| pe.event_id == id) {
            return Err(StorageError::ForeignKeyViolation("plan_events.event_id".into()));
        }
        let before = store.events.len();
        store.events.retain(|e| e.id != id);
        Ok(store.events.len() < before)
    }

    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64> {
        if self.counts_are_stale() {
            return Ok(0);
        }
        Ok(self
            .committed
            .read()
            .plan_events
            .iter()
            .filter(|pe| pe.event_id == id)
            .count() as u64)
    }
}

#[async_trait]
impl PropertyRepository for MemoryCatalog {
    async fn create(&self, new: &NewProperty) -> StorageResult<Property> {
        let mut store = self.committed.write();
        if store.property_key_taken(&new.name, new.property_type, None) {
            return Err(StorageError::UniqueViolation("properties(name, type)".into()));
        }
        let now = chrono::Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            property_type: new.property_type,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        store.properties.push(property.clone());
        Ok(property)
    }

    async fn list_all(&self) -> StorageResult<Vec<Property>> {
        Ok(self.committed.read().properties.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Property>> {
        Ok(self
            .committed
            .read()
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>> {
        Ok(self
            .committed
            .read()
            .properties
            .iter()
            .find(|p| p.name == name && p.property_type == property_type)
            .cloned())
    }

    async fn update(&self, property: &Property) -> StorageResult<Property> {
        let mut store = self.committed.write();
        if store.property_key_taken(&property.name, property.property_type, Some(property.id)) {
            return Err(StorageError::UniqueViolation("properties(name, type)".into()));
        }
        let slot = store
            .properties
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or_else(|| anyhow::anyhow!("property {} vanished", property.id))?;
        *slot = property.clone();
        Ok(property.clone())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let mut store = self.committed.write();
        if store.plan_event_properties.iter().any(|pep| pep.property_id == id) {
            return Err(StorageError::ForeignKeyViolation(
                "plan_event_properties.property_id".into(),
            ));
        }
        let before = store.properties.len();
        store.properties.retain(|p| p.id != id);
        Ok(store.properties.len() < before)
    }

    async fn count_bindings(&self, id: Uuid) -> StorageResult<u64> {
        if self.counts_are_stale() {
            return Ok(0);
        }
        Ok(self
            .committed
            .read()
            .plan_event_properties
            .iter()
            .filter(|pep| pep.property_id == id)
            .count() as u64)
    }
}

#[async_trait]
impl TrackingPlanRepository for MemoryCatalog {
    async fn list_all(&self) -> StorageResult<Vec<TrackingPlan>> {
        let store = self.committed.read();
        store.plans.iter().map(|p| store.assemble(p)).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<TrackingPlan>> {
        let store = self.committed.read();
        store
            .plans
            .iter()
            .find(|p| p.id == id)
            .map(|p| store.assemble(p))
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Option<TrackingPlan>> {
        let store = self.committed.read();
        store
            .plans
            .iter()
            .find(|p| p.name == name)
            .map(|p| store.assemble(p))
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let mut store = self.committed.write();
        store.remove_plan_events(id);
        let before = store.plans.len();
        store.plans.retain(|p| p.id != id);
        Ok(store.plans.len() < before)
    }
}

#[async_trait]
impl TransactionManager for MemoryCatalog {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryUnitOfWork {
            catalog: self.clone(),
            working: self.snapshot(),
        }))
    }
}

/// Unit of work over a private copy of the store
pub struct MemoryUnitOfWork {
    catalog: MemoryCatalog,
    working: Store,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_event(
        &mut self,
        name: &str,
        event_type: EventType,
    ) -> StorageResult<Option<Event>> {
        Ok(self
            .working
            .events
            .iter()
            .find(|e| e.name == name && e.event_type == event_type)
            .cloned())
    }

    async fn insert_event(&mut self, new: &NewEvent) -> StorageResult<Event> {
        self.catalog.take_interloper(&new.name, new.event_type.as_str());
        let taken = self.working.event_key_taken(&new.name, new.event_type, None)
            || self
                .catalog
                .committed
                .read()
                .event_key_taken(&new.name, new.event_type, None);
        if taken {
            return Err(StorageError::UniqueViolation("events(name, type)".into()));
        }

        let now = chrono::Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            event_type: new.event_type,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.events.push(event.clone());
        Ok(event)
    }

    async fn find_property(
        &mut self,
        name: &str,
        property_type: PropertyType,
    ) -> StorageResult<Option<Property>> {
        Ok(self
            .working
            .properties
            .iter()
            .find(|p| p.name == name && p.property_type == property_type)
            .cloned())
    }

    async fn insert_property(&mut self, new: &NewProperty) -> StorageResult<Property> {
        self.catalog
            .take_interloper(&new.name, new.property_type.as_str());
        let taken = self
            .working
            .property_key_taken(&new.name, new.property_type, None)
            || self
                .catalog
                .committed
                .read()
                .property_key_taken(&new.name, new.property_type, None);
        if taken {
            return Err(StorageError::UniqueViolation("properties(name, type)".into()));
        }

        let now = chrono::Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            property_type: new.property_type,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.properties.push(property.clone());
        Ok(property)
    }

    async fn insert_plan(&mut self, name: &str, description: &str) -> StorageResult<PlanRecord> {
        if self.working.plan_name_taken(name, None) {
            return Err(StorageError::UniqueViolation("tracking_plans(name)".into()));
        }
        let now = chrono::Utc::now();
        let record = PlanRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.working.plans.push(record.clone());
        Ok(record)
    }

    async fn find_plan(&mut self, id: Uuid) -> StorageResult<Option<PlanRecord>> {
        Ok(self.working.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn update_plan(&mut self, plan: &PlanRecord) -> StorageResult<PlanRecord> {
        if self.working.plan_name_taken(&plan.name, Some(plan.id)) {
            return Err(StorageError::UniqueViolation("tracking_plans(name)".into()));
        }
        let slot = self
            .working
            .plans
            .iter_mut()
            .find(|p| p.id == plan.id)
            .ok_or_else(|| anyhow::anyhow!("plan {} vanished", plan.id))?;
        *slot = plan.clone();
        Ok(plan.clone())
    }

    async fn clear_plan_events(&mut self, tracking_plan_id: Uuid) -> StorageResult<u64> {
        Ok(self.working.remove_plan_events(tracking_plan_id))
    }

    async fn insert_plan_event(&mut self, binding: &NewPlanEvent) -> StorageResult<Uuid> {
        let id = Uuid::new_v4();
        self.working.plan_events.push(PlanEventRow {
            id,
            tracking_plan_id: binding.tracking_plan_id,
            event_id: binding.event_id,
            additional_properties: binding.additional_properties,
            position: binding.position,
        });
        Ok(id)
    }

    async fn insert_plan_event_property(
        &mut self,
        binding: &NewPlanEventProperty,
    ) -> StorageResult<Uuid> {
        let id = Uuid::new_v4();
        self.working.plan_event_properties.push(PlanEventPropertyRow {
            id,
            plan_event_id: binding.plan_event_id,
            property_id: binding.property_id,
            required: binding.required,
            position: binding.position,
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let Self { catalog, working } = *self;
        *catalog.committed.write() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        Ok(())
    }
}

// ===== Fixtures =====

pub fn property_spec(name: &str, property_type: &str, required: bool) -> PlanPropertySpec {
    PlanPropertySpec {
        name: name.to_string(),
        property_type: property_type.to_string(),
        required,
        description: String::new(),
    }
}

pub fn event_spec(name: &str, event_type: &str, properties: Vec<PlanPropertySpec>) -> PlanEventSpec {
    PlanEventSpec {
        name: name.to_string(),
        event_type: event_type.to_string(),
        description: String::new(),
        additional_properties: false,
        properties,
    }
}

pub fn plan_spec(name: &str, events: Vec<PlanEventSpec>) -> TrackingPlanSpec {
    TrackingPlanSpec {
        name: name.to_string(),
        description: String::new(),
        events,
    }
}

/// The canonical "Checkout" plan
pub fn checkout_plan() -> TrackingPlanSpec {
    let mut order_completed = event_spec(
        "Order Completed",
        "track",
        vec![
            property_spec("price", "number", true),
            property_spec("currency", "string", false),
        ],
    );
    order_completed.description = "Fired when an order is placed".to_string();
    order_completed.additional_properties = true;

    TrackingPlanSpec {
        name: "Checkout".to_string(),
        description: "Checkout funnel events".to_string(),
        events: vec![
            order_completed,
            event_spec("Checkout Started", "track", vec![property_spec("price", "number", false)]),
        ],
    }
}

// ===== SQLite =====

/// Fresh in-memory SQLite database with the catalog schema applied
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn sqlite_db() -> sea_orm::DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await.unwrap();
    tracking_catalog::infra::db::migrate(&db).await.unwrap();
    db
}
