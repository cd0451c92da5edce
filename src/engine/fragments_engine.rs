use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::api::request::FragmentContext;
use crate::engine::EngineConfig;
use crate::engine::error::{ExecutionError, TaskFatalError};
use crate::engine::result::{Status, TaskResult};
use crate::engine::task_engine::TaskEngine;
use crate::graph::task::Task;

/// Processes the independent fragment tasks of one request.
///
/// Uses the map-reduce pattern: the input list is scattered into one
/// concurrent task walk per fragment, and the gathered results are re-emitted
/// in the caller's original order regardless of completion order.
#[derive(Debug, Clone)]
pub struct FragmentsEngine {
    task_engine: TaskEngine,
    config: EngineConfig,
}

impl FragmentsEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            task_engine: TaskEngine::new(config),
            config,
        }
    }

    /// Runs every fragment's task concurrently and returns one result per
    /// input, in input order. A fragment whose task has no root node
    /// short-circuits to an unprocessed result without invoking anything.
    ///
    /// A fatal walk never cancels sibling fragments; when any walk ends
    /// fatally the completed results are returned inside
    /// [`ExecutionError::FatalWalks`] together with all fatal causes.
    pub async fn execute(
        &self,
        fragments: Vec<(Task, FragmentContext)>,
    ) -> Result<Vec<TaskResult>, ExecutionError> {
        let incoming_ids: Vec<String> = fragments
            .iter()
            .map(|(_, context)| context.fragment.id().to_string())
            .collect();

        let mut walks = Vec::with_capacity(fragments.len());
        for (task, context) in fragments {
            let fragment_id = context.fragment.id().to_string();
            let engine = self.task_engine.clone();
            let handle = tokio::spawn(async move {
                match task.root_node() {
                    Some(root) => {
                        let root = Arc::clone(root);
                        engine.start(task.name(), root, context).await
                    }
                    None => Ok(TaskResult::new(task.name(), context.fragment)),
                }
            });
            walks.push((fragment_id, handle));
        }

        let mut completed = Vec::new();
        let mut failures: Vec<TaskFatalError> = Vec::new();
        let mut panicked: Vec<String> = Vec::new();
        for (fragment_id, handle) in walks {
            match handle.await {
                Ok(Ok(result)) => completed.push(result),
                Ok(Err(fatal)) => failures.push(fatal),
                // A panicked walk is an engine bug; keep gathering so sibling
                // walks still run to completion, then surface it.
                Err(_join_error) => panicked.push(fragment_id),
            }
        }
        if let Some(fragment_id) = panicked.into_iter().next() {
            return Err(ExecutionError::MissingResult { fragment_id });
        }

        let ordered = incoming_order(completed, &incoming_ids, &failures)?;
        self.trace_results(&ordered);
        if failures.is_empty() {
            Ok(ordered)
        } else {
            Err(ExecutionError::FatalWalks {
                completed: ordered,
                failures,
            })
        }
    }

    fn trace_results(&self, results: &[TaskResult]) {
        if self.config.trace_results {
            let processed: Vec<_> = results
                .iter()
                .filter(|result| result.status() != Status::Unprocessed)
                .collect();
            trace!(results = ?processed, "engine processed fragments");
        }
    }
}

impl Default for FragmentsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Correlates completed results back to the input list by fragment id. Ids
/// that failed fatally are skipped; any other miss is an internal
/// consistency error.
fn incoming_order(
    completed: Vec<TaskResult>,
    incoming_ids: &[String],
    failures: &[TaskFatalError],
) -> Result<Vec<TaskResult>, ExecutionError> {
    let mut by_id: HashMap<String, TaskResult> = completed
        .into_iter()
        .map(|result| (result.fragment().id().to_string(), result))
        .collect();

    let mut ordered = Vec::with_capacity(by_id.len());
    for fragment_id in incoming_ids {
        match by_id.remove(fragment_id) {
            Some(result) => ordered.push(result),
            None => {
                if !failures.iter().any(|fatal| fatal.fragment_id() == fragment_id) {
                    return Err(ExecutionError::MissingResult {
                        fragment_id: fragment_id.clone(),
                    });
                }
            }
        }
    }
    Ok(ordered)
}
