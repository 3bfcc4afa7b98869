//! Database module
//!
//! This module provides the in-memory data layer:
//! - Model definitions
//! - Generic collection store for CRUD and search
//! - Sample data used to seed a fresh store

pub mod models;
pub mod repository;
pub mod seed;

pub use models::*;
pub use repository::{matches_query, Collection, Entity};
