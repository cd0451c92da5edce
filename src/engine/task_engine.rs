use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{error, trace};

use crate::api::request::FragmentContext;
use crate::engine::EngineConfig;
use crate::engine::context::TaskExecutionContext;
use crate::engine::error::TaskFatalError;
use crate::engine::result::{NodeResult, TaskResult};
use crate::graph::node::{Node, NodeKind};

/// Drives one fragment's task graph from the root node to a terminal state.
///
/// Single nodes run sequentially; composite nodes fan their children out as
/// concurrent branches and fold the branch results back at a join barrier.
#[derive(Debug, Clone)]
pub struct TaskEngine {
    config: EngineConfig,
}

type WalkFuture = Pin<Box<dyn Future<Output = Result<TaskResult, TaskFatalError>> + Send>>;

impl TaskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Walks the graph to completion. A fatal operation error aborts the walk
    /// and surfaces with the partial result; every other failure mode ends as
    /// a well-formed `TaskResult`.
    pub async fn start(
        &self,
        task_name: &str,
        root: Arc<Node>,
        context: FragmentContext,
    ) -> Result<TaskResult, TaskFatalError> {
        let walk = TaskExecutionContext::new(task_name, root, context);
        self.process(walk).await.inspect_err(|fatal| {
            error!(
                task = %fatal.task_name(),
                node = %fatal.node_id(),
                fragment = %fatal.fragment_id(),
                error = %fatal.cause(),
                "fragment processing failed with fatal error"
            );
        })
    }

    // Boxed so composite branches can re-enter the walk recursively.
    fn process(&self, mut walk: TaskExecutionContext) -> WalkFuture {
        let engine = self.clone();
        Box::pin(async move {
            loop {
                let Some(node) = walk.current_node().map(Arc::clone) else {
                    return Ok(walk.into_result());
                };
                if engine.config.trace_results {
                    trace!(
                        task = %walk.task_name(),
                        node = %node.id(),
                        result = ?walk.result(),
                        "processing graph node"
                    );
                }
                walk.on_node_start(&node);
                let node_result = match node.kind() {
                    NodeKind::Single(operation) => {
                        let operation = Arc::clone(operation);
                        match operation.apply(walk.fragment_context()).await {
                            Ok(result) => walk.on_single_finish(&node, result),
                            Err(operation_error) => walk.on_node_error(&node, operation_error)?,
                        }
                    }
                    NodeKind::Composite { children, .. } => {
                        engine
                            .map_reduce(&mut walk, &node, children.clone())
                            .await?
                    }
                };
                walk.consume_and_shift(node_result);
            }
        })
    }

    /// Fan-out / fan-in for one composite node. Every branch starts from an
    /// independent copy of the current result and runs to completion before
    /// reduction; a fatal branch never cancels its siblings, its partial
    /// result joins the reduction and the fatal resurfaces afterwards.
    async fn map_reduce(
        &self,
        walk: &mut TaskExecutionContext,
        node: &Node,
        children: Vec<Arc<Node>>,
    ) -> Result<NodeResult, TaskFatalError> {
        if children.is_empty() {
            return Ok(walk.on_composite_empty(node));
        }

        let mut branches = Vec::with_capacity(children.len());
        for child in children {
            branches.push(tokio::spawn(self.process(walk.branch(child))));
        }

        let mut reduced = TaskResult::new(walk.task_name(), walk.result().fragment().clone());
        let mut first_fatal: Option<TaskFatalError> = None;
        for branch in branches {
            match branch.await {
                Ok(Ok(branch_result)) => reduced.merge(branch_result),
                Ok(Err(branch_fatal)) => {
                    reduced.merge(branch_fatal.result().clone());
                    first_fatal.get_or_insert(branch_fatal);
                }
                Err(join_error) => {
                    first_fatal.get_or_insert(TaskFatalError::new(
                        walk.task_name(),
                        node.id(),
                        anyhow::Error::from(join_error),
                        walk.result().clone(),
                    ));
                }
            }
        }

        match first_fatal {
            Some(fatal) => {
                // Carry the whole walk history up to the composite, not just
                // the branch outcomes, as the diagnostic partial result.
                let mut carried = walk.result().clone();
                carried.merge(reduced);
                Err(fatal.with_result(carried))
            }
            None => Ok(walk.on_composite_finish(node, reduced)),
        }
    }
}
