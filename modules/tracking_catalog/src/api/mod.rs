//! API layer - transport adapters over the domain service

pub mod rest;
