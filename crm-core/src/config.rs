//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Client Validation =====

/// Minimum length for a client's company name
pub const MIN_CLIENT_NAME_LENGTH: usize = 2;
/// Minimum length for the contact person's name
pub const MIN_CLIENT_CONTACT_LENGTH: usize = 2;
/// Minimum length for a phone number (digits, spaces and prefix included)
pub const MIN_CLIENT_PHONE_LENGTH: usize = 9;
/// Minimum length for a client's location
pub const MIN_CLIENT_LOCATION_LENGTH: usize = 2;

// ===== Document Validation =====

/// Minimum length for a document title
pub const MIN_DOCUMENT_TITLE_LENGTH: usize = 2;
/// Minimum length for a document description
pub const MIN_DOCUMENT_DESCRIPTION_LENGTH: usize = 5;

/// Categories offered by the document form
pub const DOCUMENT_CATEGORIES: &[&str] = &[
    "Permits",
    "Contracts",
    "Quotes",
    "Invoices",
    "Audits",
    "Plans",
    "Reports",
    "Other",
];

/// File size shown for documents created without an attachment
pub const DEFAULT_DOCUMENT_FILE_SIZE: &str = "0 KB";
/// File type assumed for documents created without an attachment
pub const DEFAULT_DOCUMENT_FILE_TYPE: &str = "pdf";

/// Maximum stored length of an attachment's file name
pub const MAX_FILE_NAME_LENGTH: usize = 255;

// ===== Backend Simulation =====

/// Default artificial latency applied before every mutation commits
pub const DEFAULT_SIMULATED_LATENCY_MS: u64 = 500;

/// Maximum accepted simulated latency (10 seconds).
/// Longer values leave dialogs locked in the loading state.
pub const MAX_SIMULATED_LATENCY_MS: u64 = 10_000;

// ===== Notes =====

/// Author stamped on notes when settings don't name one
pub const DEFAULT_NOTE_AUTHOR: &str = "Current User";

// ===== Dashboard =====

/// Number of entries retained in the recent-activity feed
pub const ACTIVITY_FEED_CAPACITY: usize = 50;

/// Number of clients listed in the dashboard overview
pub const CLIENTS_OVERVIEW_LIMIT: usize = 5;

/// Settings file name inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";
