//! Renovation tasks service
//!
//! Read-only catalogue of priced renovation tasks used when preparing quotes.

use crate::database::seed::renovation_tasks;
use crate::database::{EntityId, Task};
use std::sync::Arc;

/// Service over the renovation task catalogue
#[derive(Clone)]
pub struct TasksService {
    tasks: Arc<Vec<Task>>,
}

impl Default for TasksService {
    fn default() -> Self {
        Self::new(renovation_tasks())
    }
}

impl TasksService {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(tasks),
        }
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.tasks.as_ref().clone()
    }

    pub fn get_task(&self, id: EntityId) -> Option<Task> {
        self.tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Search tasks by name, category or description
    pub fn search_tasks(&self, query: &str) -> Vec<Task> {
        let query_lower = query.trim().to_lowercase();

        self.tasks
            .iter()
            .filter(|task| {
                task.name.to_lowercase().contains(&query_lower)
                    || task.category.to_lowercase().contains(&query_lower)
                    || task.description.to_lowercase().contains(&query_lower)
            })
            .cloned()
            .collect()
    }

    /// Tasks eligible for an energy-efficiency subsidy
    pub fn subsidized_tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.has_subsidy)
            .cloned()
            .collect()
    }

    pub fn count_tasks(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_tasks() {
        let service = TasksService::default();

        let results = service.search_tasks("insulation");
        let ids: Vec<EntityId> = results.iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![1, 8]);
        assert_eq!(service.search_tasks("").len(), 8);
        assert!(service.search_tasks("plumbing").is_empty());
    }

    #[test]
    fn test_subsidized_tasks() {
        let service = TasksService::default();

        assert_eq!(service.subsidized_tasks().len(), 5);
        assert!(service.subsidized_tasks().iter().all(|t| t.has_subsidy));
    }

    #[test]
    fn test_get_task() {
        let service = TasksService::default();

        let task = service.get_task(3).unwrap();
        assert_eq!(task.name, "Aerothermal Heat Pump");
        assert_eq!(task.cost, 6500.0);
        assert!(service.get_task(42).is_none());
    }
}
