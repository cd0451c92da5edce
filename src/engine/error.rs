use thiserror::Error;

use crate::engine::result::TaskResult;

/// Non-recoverable failure of one fragment walk. Carries the partial result
/// accumulated up to the aborting node for diagnostics.
#[derive(Debug, Error)]
#[error("task '{task_name}' aborted at node '{node_id}': {cause}")]
pub struct TaskFatalError {
    task_name: String,
    node_id: String,
    cause: anyhow::Error,
    result: TaskResult,
}

impl TaskFatalError {
    pub(crate) fn new(
        task_name: impl Into<String>,
        node_id: impl Into<String>,
        cause: anyhow::Error,
        result: TaskResult,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            node_id: node_id.into(),
            cause,
            result,
        }
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Partial result at the moment the walk aborted.
    pub fn result(&self) -> &TaskResult {
        &self.result
    }

    pub fn fragment_id(&self) -> &str {
        self.result.fragment().id()
    }

    pub(crate) fn with_result(mut self, result: TaskResult) -> Self {
        self.result = result;
        self
    }
}

/// Request-level failure of [`crate::engine::FragmentsEngine::execute`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// One or more fragment walks failed fatally. Sibling fragments were not
    /// cancelled; their completed results are carried alongside the causes so
    /// callers can decide whether partial output is usable.
    #[error("{} fragment walk(s) failed fatally", failures.len())]
    FatalWalks {
        completed: Vec<TaskResult>,
        failures: Vec<TaskFatalError>,
    },
    /// A completed result could not be correlated back to an input fragment.
    /// This is an engine bug, never a recoverable condition.
    #[error("no result for fragment '{fragment_id}'")]
    MissingResult { fragment_id: String },
}
