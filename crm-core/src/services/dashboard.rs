//! Dashboard service
//!
//! Overview figures derived from the live stores.

use crate::config::CLIENTS_OVERVIEW_LIMIT;
use crate::database::{Client, ClientStatus};
use crate::services::activity::{Activity, ActivityLog};
use crate::services::{ClientsService, DocumentsService, TasksService};
use serde::Serialize;

/// Headline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_clients: usize,
    /// Projects belonging to clients in the Active status
    pub active_projects: u32,
    pub task_items: usize,
    pub documents: usize,
}

/// Everything the dashboard shows at once
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub metrics: DashboardMetrics,
    /// Most recently added clients, newest first
    pub clients_overview: Vec<Client>,
    pub recent_activity: Vec<Activity>,
}

#[derive(Clone)]
pub struct DashboardService {
    clients: ClientsService,
    documents: DocumentsService,
    tasks: TasksService,
    activity: ActivityLog,
}

impl DashboardService {
    pub fn new(
        clients: ClientsService,
        documents: DocumentsService,
        tasks: TasksService,
        activity: ActivityLog,
    ) -> Self {
        Self {
            clients,
            documents,
            tasks,
            activity,
        }
    }

    pub async fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics {
            total_clients: self.clients.count_clients().await,
            active_projects: self.clients.count_projects(ClientStatus::Active).await,
            task_items: self.tasks.count_tasks(),
            documents: self.documents.count_documents().await,
        }
    }

    pub async fn snapshot(&self, activity_limit: usize) -> DashboardSnapshot {
        let mut clients_overview = self.clients.list_clients().await;
        clients_overview.reverse();
        clients_overview.truncate(CLIENTS_OVERVIEW_LIMIT);

        DashboardSnapshot {
            metrics: self.metrics().await,
            clients_overview,
            recent_activity: self.activity.recent(activity_limit).await,
        }
    }
}
