use std::sync::Arc;

use tracing::warn;

use crate::api::operation::{
    ERROR_TRANSITION, FragmentResult, OperationError, SUCCESS_TRANSITION,
};
use crate::api::request::{ClientRequest, FragmentContext};
use crate::engine::error::TaskFatalError;
use crate::engine::event_log::NodeStatus;
use crate::engine::result::{NodeResult, Status, TaskResult};
use crate::graph::node::Node;

/// Walk state for one fragment task (or one composite branch): the node
/// cursor, the accumulated result and the shared client request.
pub(crate) struct TaskExecutionContext {
    task_name: String,
    current: Option<Arc<Node>>,
    result: TaskResult,
    client_request: Arc<ClientRequest>,
}

impl TaskExecutionContext {
    pub(crate) fn new(
        task_name: impl Into<String>,
        root: Arc<Node>,
        context: FragmentContext,
    ) -> Self {
        let task_name = task_name.into();
        Self {
            result: TaskResult::new(&task_name, context.fragment),
            task_name,
            current: Some(root),
            client_request: context.client_request,
        }
    }

    /// Independent context for one composite branch: the branch starts from a
    /// copy of the current fragment so siblings cannot observe each other's
    /// in-progress mutations.
    pub(crate) fn branch(&self, child: Arc<Node>) -> Self {
        Self {
            task_name: self.task_name.clone(),
            current: Some(child),
            result: TaskResult::new(&self.task_name, self.result.fragment().clone()),
            client_request: Arc::clone(&self.client_request),
        }
    }

    pub(crate) fn task_name(&self) -> &str {
        &self.task_name
    }

    pub(crate) fn current_node(&self) -> Option<&Arc<Node>> {
        self.current.as_ref()
    }

    pub(crate) fn result(&self) -> &TaskResult {
        &self.result
    }

    pub(crate) fn into_result(self) -> TaskResult {
        self.result
    }

    pub(crate) fn fragment_context(&self) -> FragmentContext {
        FragmentContext::new(
            self.result.fragment().clone(),
            Arc::clone(&self.client_request),
        )
    }

    pub(crate) fn on_node_start(&mut self, node: &Node) {
        self.result.log_mut().node_started(node.id());
    }

    pub(crate) fn on_single_finish(&mut self, node: &Node, result: FragmentResult) -> NodeResult {
        if result.transition == ERROR_TRANSITION {
            self.result.log_mut().error(node.id(), &result);
        } else {
            self.result.log_mut().success(node.id(), &result);
        }
        NodeResult::from_single(result)
    }

    /// Recoverable errors turn into a failure outcome routed through the
    /// `_error` edge; fatal errors abort the walk with the partial result.
    pub(crate) fn on_node_error(
        &mut self,
        node: &Node,
        error: OperationError,
    ) -> Result<NodeResult, TaskFatalError> {
        self.result.log_mut().exception(node.id(), error.cause());
        self.result.set_status(Status::Failure);
        if error.is_fatal() {
            return Err(TaskFatalError::new(
                &self.task_name,
                node.id(),
                error.into_cause(),
                self.result.clone(),
            ));
        }
        warn!(
            task = %self.task_name,
            node = %node.id(),
            error = %error.cause(),
            "node failed, trying the error transition"
        );
        Ok(NodeResult::recovered_error(self.result.fragment().clone()))
    }

    pub(crate) fn on_composite_finish(&mut self, node: &Node, reduced: TaskResult) -> NodeResult {
        let transition = reduced
            .status()
            .default_transition()
            .unwrap_or(SUCCESS_TRANSITION);
        let status = match reduced.status() {
            Status::Success => NodeStatus::Success,
            Status::Failure => NodeStatus::Error,
            Status::Unprocessed => NodeStatus::Unprocessed,
        };
        let node_result = NodeResult::from_composite(&reduced, transition);
        self.result.log_mut().append_all(reduced.into_log());
        self.result.log_mut().composite(node.id(), status, transition);
        node_result
    }

    /// An empty composite has nothing to reduce; it still gets its terminal
    /// log entry, recorded as unprocessed.
    pub(crate) fn on_composite_empty(&mut self, node: &Node) -> NodeResult {
        self.result
            .log_mut()
            .composite(node.id(), NodeStatus::Unprocessed, SUCCESS_TRANSITION);
        NodeResult::from_empty_composite(self.result.fragment().clone())
    }

    /// Applies a node outcome and moves the cursor along the matching edge.
    /// A missing edge ends the walk: quietly for the success transition, as
    /// an unsupported-transition failure for anything else.
    pub(crate) fn consume_and_shift(&mut self, node_result: NodeResult) {
        self.result.consume(&node_result);
        let current = self
            .current
            .take()
            .expect("consume_and_shift called on a finished walk");
        match current.next(&node_result.transition) {
            Some(next) => self.current = Some(Arc::clone(next)),
            None => {
                if node_result.transition != SUCCESS_TRANSITION {
                    self.result.set_status(Status::Failure);
                    self.result
                        .log_mut()
                        .unsupported(current.id(), &node_result.transition);
                }
            }
        }
    }

    pub(crate) fn finished(&self) -> bool {
        self.current.is_none()
    }
}
