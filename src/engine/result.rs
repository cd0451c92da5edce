use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::fragment::Fragment;
use crate::api::operation::{ERROR_TRANSITION, FragmentResult, SUCCESS_TRANSITION};
use crate::engine::event_log::EventLog;

/// Terminal status of a fragment task (or of one of its branches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Unprocessed,
    Success,
    Failure,
}

impl Status {
    pub fn default_transition(self) -> Option<&'static str> {
        match self {
            Status::Success => Some(SUCCESS_TRANSITION),
            Status::Failure => Some(ERROR_TRANSITION),
            Status::Unprocessed => None,
        }
    }
}

/// Engine-internal outcome of one node, Single or Composite. For a composite
/// node this is synthesized from the reduced branch results.
#[derive(Debug, Clone)]
pub struct NodeResult {
    pub fragment: Fragment,
    pub transition: String,
    pub status: Status,
    pub node_log: Option<Value>,
}

impl NodeResult {
    pub fn from_single(result: FragmentResult) -> Self {
        Self {
            fragment: result.fragment,
            transition: result.transition,
            status: Status::Success,
            node_log: result.node_log,
        }
    }

    pub fn from_composite(reduced: &TaskResult, transition: &str) -> Self {
        Self {
            fragment: reduced.fragment.clone(),
            transition: transition.to_string(),
            status: reduced.status,
            node_log: None,
        }
    }

    pub fn from_empty_composite(fragment: Fragment) -> Self {
        Self {
            fragment,
            transition: SUCCESS_TRANSITION.to_string(),
            status: Status::Unprocessed,
            node_log: None,
        }
    }

    pub fn recovered_error(fragment: Fragment) -> Self {
        Self {
            fragment,
            transition: ERROR_TRANSITION.to_string(),
            status: Status::Failure,
            node_log: None,
        }
    }
}

/// Accumulated state of one fragment's walk: the current fragment snapshot,
/// the reduced status and the execution log. Owned exclusively by its walk
/// (or by exactly one branch) until merged at a join point.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    fragment: Fragment,
    status: Status,
    log: EventLog,
}

impl TaskResult {
    pub fn new(task_name: impl Into<String>, fragment: Fragment) -> Self {
        Self {
            fragment,
            status: Status::Unprocessed,
            log: EventLog::new(task_name),
        }
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Appends another log's entries to this result's log.
    pub fn append_log(&mut self, log: EventLog) {
        self.log.append_all(log);
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Overwrites this result with a node's outcome: last write wins for the
    /// payload, body and status, no accumulation between walk steps.
    pub fn consume(&mut self, node_result: &NodeResult) {
        let payload = node_result.fragment.payload().clone();
        self.fragment.clear_payload();
        self.fragment.merge_in_payload(&payload);
        self.fragment.set_body(node_result.fragment.body());
        self.status = node_result.status;
    }

    /// Combines the outcome of a sibling branch into this one. Payload keys
    /// are unioned with last-write-wins on collision (a documented
    /// limitation, not a conflict-aware merge); the status reduces with
    /// failure dominating; logs are concatenated.
    pub fn merge(&mut self, other: TaskResult) {
        self.fragment.merge_in_payload(other.fragment.payload());
        self.status = reduce_status(self.status, other.status);
        self.log.append_all(other.log);
    }
}

fn reduce_status(first: Status, second: Status) -> Status {
    match (first, second) {
        (Status::Failure, _) | (_, Status::Failure) => Status::Failure,
        (Status::Unprocessed, Status::Unprocessed) => Status::Unprocessed,
        _ => Status::Success,
    }
}
