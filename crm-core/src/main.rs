// ConstruCRM - construction business CRM core
// Entry point and application setup

use construcrm::app;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the data directory
const DATA_DIR_ENV: &str = "CONSTRUCRM_DATA_DIR";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "construcrm=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ConstruCRM");

    let data_dir = std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"));

    let state = app::setup(data_dir).await?;

    let mut dashboard = state.dashboard_page();
    let snapshot = dashboard.refresh().await;
    let metrics = snapshot.metrics;

    tracing::info!(
        "Dashboard: {} clients, {} active projects, {} task items, {} documents",
        metrics.total_clients,
        metrics.active_projects,
        metrics.task_items,
        metrics.documents
    );
    for client in &snapshot.clients_overview {
        tracing::info!("  {} ({}, {})", client.name, client.location, client.status);
    }

    Ok(())
}
