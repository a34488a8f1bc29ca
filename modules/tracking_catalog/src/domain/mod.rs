//! Domain layer - business logic and services

pub mod composer;
pub mod reconcile;
pub mod repository;
pub mod service;
pub mod validation;

pub use composer::TrackingPlanComposer;
pub use repository::{
    EventRepository, PropertyRepository, StorageError, TrackingPlanRepository, TransactionManager,
    UnitOfWork,
};
pub use service::Service;
