//! ConstruCRM library
//!
//! This library exposes the core of ConstruCRM: the client, document and
//! note stores, form validation, the mutation pipeline and the page
//! controllers built on top of them.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod pages;
pub mod services;
pub mod storage;
pub mod validation;
