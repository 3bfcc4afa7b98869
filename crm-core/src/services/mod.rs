//! Services module
//!
//! Business logic services that coordinate between pages and the stores.

pub mod activity;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod notes;
pub mod pipeline;
pub mod settings;
pub mod tasks;

pub use activity::{Activity, ActivityLog};
pub use clients::ClientsService;
pub use dashboard::{DashboardMetrics, DashboardService, DashboardSnapshot};
pub use documents::DocumentsService;
pub use notes::NotesService;
pub use pipeline::{
    Backend, CancelSignal, Dialog, MutationKind, MutationPipeline, Notification,
    NotificationLevel, Notifier, Operation, PipelineState, SimulatedBackend,
};
pub use settings::{AppSettings, SettingsService};
pub use tasks::TasksService;
