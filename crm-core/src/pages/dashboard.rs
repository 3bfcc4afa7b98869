//! Dashboard page

use crate::services::{DashboardService, DashboardSnapshot};

/// Number of activity entries shown on the dashboard
const RECENT_ACTIVITY_LIMIT: usize = 5;

pub struct DashboardPage {
    dashboard: DashboardService,
    snapshot: Option<DashboardSnapshot>,
}

impl DashboardPage {
    pub fn new(dashboard: DashboardService) -> Self {
        Self {
            dashboard,
            snapshot: None,
        }
    }

    /// Re-read every figure from the live stores
    pub async fn refresh(&mut self) -> &DashboardSnapshot {
        let snapshot = self.dashboard.snapshot(RECENT_ACTIVITY_LIMIT).await;
        self.snapshot.insert(snapshot)
    }

    /// The last refreshed snapshot, if any
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }
}
