//! Infrastructure layer - database access

pub mod db;
pub mod storage;
