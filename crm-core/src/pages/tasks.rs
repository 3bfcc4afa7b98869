//! Renovation tasks page

use super::ListSummary;
use crate::database::Task;
use crate::services::TasksService;

/// Task catalogue with a search box and a subsidy filter
pub struct TasksPage {
    tasks: TasksService,
    search_query: String,
    subsidy_only: bool,
}

impl TasksPage {
    pub fn new(tasks: TasksService) -> Self {
        Self {
            tasks,
            search_query: String::new(),
            subsidy_only: false,
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_subsidy_only(&mut self, subsidy_only: bool) {
        self.subsidy_only = subsidy_only;
    }

    pub fn visible_tasks(&self) -> Vec<Task> {
        self.tasks
            .search_tasks(&self.search_query)
            .into_iter()
            .filter(|task| !self.subsidy_only || task.has_subsidy)
            .collect()
    }

    pub fn summary(&self) -> ListSummary {
        ListSummary {
            shown: self.visible_tasks().len(),
            total: self.tasks.count_tasks(),
        }
    }
}
