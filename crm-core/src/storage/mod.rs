//! Storage module
//!
//! Provides blob storage for document attachments and the file metadata
//! derived from an upload.

pub mod blob_store;
pub mod file_info;

pub use blob_store::BlobStore;
pub use file_info::{file_type_from_name, format_file_size, sanitize_filename, FileUpload};
