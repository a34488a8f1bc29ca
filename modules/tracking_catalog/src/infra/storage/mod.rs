//! Storage layer - database entities, repositories and units of work

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;
pub mod unit_of_work;

pub use repositories::{SeaOrmEventRepository, SeaOrmPropertyRepository, SeaOrmTrackingPlanRepository};
pub use unit_of_work::SeaOrmTransactionManager;
