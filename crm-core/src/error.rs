//! Error types for the CRM core
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use crate::validation::{FieldError, ValidationErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Another operation is already in progress")]
    Busy,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("No {0} selected")]
    NoSelection(&'static str),

    #[error("Blob store error: {0}")]
    BlobStore(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    /// Field-level messages, empty for non-validation errors
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Validation(errors) => errors.as_slice(),
            _ => &[],
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
