//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.
//! Every page built from the same AppState shares the same stores.

use crate::database::seed::{sample_clients, sample_documents};
use crate::database::{Client, Collection, Document, EntityId};
use crate::error::Result;
use crate::pages::{ClientDetailsPage, ClientsPage, DashboardPage, DocumentsPage, TasksPage};
use crate::services::{
    ActivityLog, AppSettings, Backend, ClientsService, DashboardService, DocumentsService,
    MutationPipeline, NotesService, Notifier, SettingsService, SimulatedBackend, TasksService,
};
use crate::storage::BlobStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub settings: AppSettings,
    pub clients: ClientsService,
    pub documents: DocumentsService,
    pub tasks: TasksService,
    pub dashboard: DashboardService,
    pub notifier: Notifier,
    pub activity: ActivityLog,
    backend: Arc<dyn Backend>,
}

impl AppState {
    /// State backed by the simulated backend configured in `settings`
    pub fn new(settings: AppSettings) -> Self {
        let backend = Arc::new(SimulatedBackend::new(settings.backend.latency()));
        Self::with_backend(settings, backend)
    }

    pub fn with_backend(settings: AppSettings, backend: Arc<dyn Backend>) -> Self {
        let (clients, documents): (Vec<Client>, Vec<Document>) = if settings.seed_sample_data {
            (sample_clients(), sample_documents())
        } else {
            (Vec::new(), Vec::new())
        };

        let clients = ClientsService::new(Collection::with_items(clients));
        let documents = DocumentsService::new(
            Collection::with_items(documents),
            NotesService::new(Collection::new()),
            BlobStore::new(),
        );
        let tasks = TasksService::default();
        let activity = ActivityLog::default();
        let dashboard = DashboardService::new(
            clients.clone(),
            documents.clone(),
            tasks.clone(),
            activity.clone(),
        );

        Self {
            settings,
            clients,
            documents,
            tasks,
            dashboard,
            notifier: Notifier::new(),
            activity,
            backend,
        }
    }

    /// A fresh pipeline; each page gets its own loading flag
    pub fn pipeline(&self) -> MutationPipeline {
        MutationPipeline::new(
            self.backend.clone(),
            self.notifier.clone(),
            self.activity.clone(),
        )
    }

    pub fn clients_page(&self) -> ClientsPage {
        ClientsPage::new(self.clients.clone(), self.pipeline())
    }

    pub fn client_details_page(&self, client_id: EntityId) -> ClientDetailsPage {
        ClientDetailsPage::new(self.clients.clone(), self.pipeline(), client_id)
    }

    pub fn documents_page(&self) -> DocumentsPage {
        DocumentsPage::new(
            self.documents.clone(),
            self.pipeline(),
            self.settings.notes.author(),
        )
    }

    pub fn tasks_page(&self) -> TasksPage {
        TasksPage::new(self.tasks.clone())
    }

    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.dashboard.clone())
    }
}

/// Application setup - called once on startup
pub async fn setup(data_dir: PathBuf) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", data_dir);

    tokio::fs::create_dir_all(&data_dir).await?;

    let settings = SettingsService::new(data_dir).load().await?;
    tracing::debug!(
        "Simulated backend latency: {} ms, sample data: {}",
        settings.backend.simulated_latency_ms,
        settings.seed_sample_data
    );

    let state = AppState::new(settings);

    tracing::info!("Application initialized successfully");

    Ok(state)
}
