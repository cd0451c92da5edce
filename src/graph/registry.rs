use std::sync::Arc;

use dashmap::DashMap;

use crate::graph::task::Task;

/// Registry of compiled tasks, keyed by task name. Graphs are compiled once
/// (outside the engine) and shared read-only across all requests.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<String, Arc<Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, task: Task) {
        self.tasks.insert(task.name().to_string(), Arc::new(task));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Task>> {
        self.tasks.get(name).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
