//! In-memory collection store
//!
//! This module provides CRUD operations for every entity type.
//! Each collection is a shared, ordered list guarded by an async RwLock;
//! all writes (including id assignment) happen under the write lock.

use super::models::{EntityId, EntityKind};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A record that can live in a [`Collection`]
pub trait Entity: Clone + Send + Sync + 'static {
    /// Fields supplied on creation (everything except id and timestamps)
    type Draft: Send;
    /// Partial fields merged on update
    type Patch: Send;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    fn from_draft(id: EntityId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Fields matched by free-text search
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring match against any of the entity's search fields
pub fn matches_query<T: Entity>(entity: &T, query: &str) -> bool {
    let query_lower = query.to_lowercase();
    entity
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&query_lower))
}

/// Shared, insertion-ordered collection of entities
#[derive(Clone)]
pub struct Collection<T: Entity> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Build a collection from existing records, keeping their ids
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Insert a new entity with id = max existing id + 1 (or 1 when empty)
    pub async fn add(&self, draft: T::Draft) -> T {
        let mut items = self.items.write().await;

        let id = items.iter().map(Entity::id).max().map_or(1, |max| max + 1);
        let entity = T::from_draft(id, draft, Utc::now());
        items.push(entity.clone());

        tracing::debug!("Created {}: {}", T::KIND, id);
        entity
    }

    /// Merge a patch into the entity with the given id
    pub async fn update(&self, id: EntityId, patch: T::Patch) -> Result<T> {
        let mut items = self.items.write().await;

        let entity = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND.label(), id))?;

        entity.apply_patch(patch, Utc::now());

        tracing::debug!("Updated {}: {}", T::KIND, id);
        Ok(entity.clone())
    }

    /// Remove the entity with the given id, returning it
    pub async fn remove(&self, id: EntityId) -> Result<T> {
        let mut items = self.items.write().await;

        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND.label(), id))?;

        let removed = items.remove(position);

        tracing::debug!("Removed {}: {}", T::KIND, id);
        Ok(removed)
    }

    /// Remove every entity matching the predicate, returning how many went
    pub async fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| !predicate(item));
        before - items.len()
    }

    /// Get an entity by id
    pub async fn find(&self, id: EntityId) -> Option<T> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Get an entity by id, failing with NotFound when absent
    pub async fn get(&self, id: EntityId) -> Result<T> {
        self.find(id)
            .await
            .ok_or_else(|| AppError::not_found(T::KIND.label(), id))
    }

    /// List all entities in insertion order
    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Entities matching the predicate, in insertion order
    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Free-text search over the entity's search fields.
    /// An empty (or whitespace-only) query returns the whole collection.
    pub async fn search(&self, query: &str) -> Vec<T> {
        let query = query.trim();
        if query.is_empty() {
            return self.list().await;
        }

        self.filter(|item| matches_query(item, query)).await
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}
