use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::operation::{ERROR_TRANSITION, FragmentResult};

/// How one node invocation ended, as recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    Success,
    UnsupportedTransition,
    Error,
    Unprocessed,
}

/// One immutable record in a fragment task's execution history. Timestamps
/// are per-entry wall-clock millis; entries from concurrent branches are not
/// globally ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub task: String,
    pub node: String,
    pub status: NodeStatus,
    pub transition: Option<String>,
    pub timestamp: u64,
    #[serde(rename = "nodeLog", skip_serializing_if = "Option::is_none")]
    pub node_log: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventLogEntry {
    fn new(
        task: &str,
        node: &str,
        status: NodeStatus,
        transition: Option<String>,
        node_log: Option<Value>,
        error: Option<String>,
    ) -> Self {
        Self {
            task: task.to_string(),
            node: node.to_string(),
            status,
            transition,
            timestamp: now_millis(),
            node_log,
            error,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Append-only record of node executions for one fragment task. Concurrent
/// branches write to independent logs that are concatenated at merge time, so
/// no cross-branch locking happens during branch execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    task_name: String,
    operations: Vec<EventLogEntry>,
}

impl EventLog {
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            operations: Vec::new(),
        }
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn node_started(&mut self, node: &str) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            NodeStatus::Unprocessed,
            None,
            None,
            None,
        ));
    }

    pub fn success(&mut self, node: &str, result: &FragmentResult) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            NodeStatus::Success,
            Some(result.transition.clone()),
            result.node_log.clone(),
            None,
        ));
    }

    pub fn error(&mut self, node: &str, result: &FragmentResult) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            NodeStatus::Error,
            Some(result.transition.clone()),
            result.node_log.clone(),
            None,
        ));
    }

    pub fn exception(&mut self, node: &str, error: &anyhow::Error) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            NodeStatus::Error,
            Some(ERROR_TRANSITION.to_string()),
            None,
            Some(format!("{error:#}")),
        ));
    }

    pub fn unsupported(&mut self, node: &str, transition: &str) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            NodeStatus::UnsupportedTransition,
            Some(transition.to_string()),
            None,
            None,
        ));
    }

    /// Terminal entry for a composite node after reduction.
    pub fn composite(&mut self, node: &str, status: NodeStatus, transition: &str) {
        self.append(EventLogEntry::new(
            &self.task_name,
            node,
            status,
            Some(transition.to_string()),
            None,
            None,
        ));
    }

    pub fn append(&mut self, entry: EventLogEntry) {
        self.operations.push(entry);
    }

    pub fn append_all(&mut self, other: EventLog) {
        self.operations.extend(other.operations);
    }

    pub fn operations(&self) -> &[EventLogEntry] {
        &self.operations
    }

    pub fn earliest_timestamp(&self) -> u64 {
        self.operations
            .iter()
            .map(|entry| entry.timestamp)
            .min()
            .unwrap_or(0)
    }

    pub fn latest_timestamp(&self) -> u64 {
        self.operations
            .iter()
            .map(|entry| entry.timestamp)
            .max()
            .unwrap_or(0)
    }
}
