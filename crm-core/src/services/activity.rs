//! Recent-activity feed
//!
//! A bounded, newest-first log of committed mutations shown on the dashboard.

use crate::config::ACTIVITY_FEED_CAPACITY;
use crate::database::EntityKind;
use crate::services::pipeline::Operation;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: u64,
    pub kind: EntityKind,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

#[derive(Default)]
struct Feed {
    entries: VecDeque<Activity>,
    next_id: u64,
}

/// Shared activity feed
#[derive(Clone)]
pub struct ActivityLog {
    feed: Arc<RwLock<Feed>>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(ACTIVITY_FEED_CAPACITY)
    }
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: Arc::new(RwLock::new(Feed::default())),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry for a committed operation, evicting the oldest
    pub async fn record(&self, operation: &Operation) {
        let description = match (&operation.subject, operation.id) {
            (Some(subject), _) => subject.clone(),
            (None, Some(id)) => format!("{} #{}", operation.entity.label(), id),
            (None, None) => operation.entity.label().to_string(),
        };

        let mut feed = self.feed.write().await;
        feed.next_id += 1;
        let activity = Activity {
            id: feed.next_id,
            kind: operation.entity,
            title: operation.activity_title().to_string(),
            description,
            at: Utc::now(),
        };

        feed.entries.push_front(activity);
        feed.entries.truncate(self.capacity);
    }

    /// Up to `limit` entries, newest first
    pub async fn recent(&self, limit: usize) -> Vec<Activity> {
        self.feed
            .read()
            .await
            .entries
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.feed.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.feed.read().await.entries.is_empty()
    }
}
