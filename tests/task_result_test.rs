mod common;

use serde_json::json;
use splice::api::operation::{FragmentResult, SUCCESS_TRANSITION};
use splice::engine::{EventLog, NodeResult, NodeStatus, Status, TaskResult};

fn result_with_status(status: Status) -> TaskResult {
    let mut result = TaskResult::new("task", common::new_fragment("body"));
    result.set_status(status);
    result
}

const ALL_STATUSES: [Status; 3] = [Status::Unprocessed, Status::Success, Status::Failure];

#[test]
fn merged_status_is_commutative() {
    for first in ALL_STATUSES {
        for second in ALL_STATUSES {
            let mut left = result_with_status(first);
            left.merge(result_with_status(second));
            let mut right = result_with_status(second);
            right.merge(result_with_status(first));
            assert_eq!(left.status(), right.status(), "{first:?} vs {second:?}");
        }
    }
}

#[test]
fn failure_dominates_merge() {
    for status in ALL_STATUSES {
        let mut result = result_with_status(status);
        result.merge(result_with_status(Status::Failure));
        assert_eq!(result.status(), Status::Failure);
    }
}

#[test]
fn merge_is_unprocessed_only_when_both_sides_are() {
    let mut both = result_with_status(Status::Unprocessed);
    both.merge(result_with_status(Status::Unprocessed));
    assert_eq!(both.status(), Status::Unprocessed);

    let mut one_side = result_with_status(Status::Unprocessed);
    one_side.merge(result_with_status(Status::Success));
    assert_eq!(one_side.status(), Status::Success);
}

#[test]
fn merge_unions_payload_with_last_write_winning() {
    let mut base_fragment = common::new_fragment("base");
    base_fragment.append_payload("shared", json!("base"));
    base_fragment.append_payload("base-only", json!(1));
    let mut base = TaskResult::new("task", base_fragment);

    let mut other_fragment = common::new_fragment("other");
    other_fragment.append_payload("shared", json!("other"));
    other_fragment.append_payload("other-only", json!(2));
    base.merge(TaskResult::new("task", other_fragment));

    let payload = base.fragment().payload();
    assert_eq!(payload.get("shared"), Some(&json!("other")));
    assert_eq!(payload.get("base-only"), Some(&json!(1)));
    assert_eq!(payload.get("other-only"), Some(&json!(2)));
    // Merge never touches the base body.
    assert_eq!(base.fragment().body(), "base");
}

fn stamp(result: &mut TaskResult, node: &str) {
    let mut log = EventLog::new(result.log().task_name());
    log.node_started(node);
    result.append_log(log);
}

#[test]
fn merge_concatenates_logs() {
    let mut base = TaskResult::new("task", common::new_fragment("base"));
    stamp(&mut base, "first");
    let mut other = TaskResult::new("task", common::new_fragment("other"));
    stamp(&mut other, "second");

    base.merge(other);

    let nodes: Vec<_> = base
        .log()
        .operations()
        .iter()
        .map(|entry| entry.node.clone())
        .collect();
    assert_eq!(nodes, vec!["first", "second"]);
}

#[test]
fn consume_overwrites_payload_body_and_status() {
    let mut initial = common::new_fragment("initial");
    initial.append_payload("stale", json!(true));
    let mut result = TaskResult::new("task", initial);

    let mut updated = common::new_fragment("updated");
    updated.append_payload("fresh", json!(true));
    result.consume(&NodeResult::from_single(FragmentResult::success(updated)));

    assert_eq!(result.status(), Status::Success);
    assert_eq!(result.fragment().body(), "updated");
    assert_eq!(result.fragment().payload().get("fresh"), Some(&json!(true)));
    assert!(result.fragment().payload().get("stale").is_none());
}

#[test]
fn status_default_transitions() {
    assert_eq!(Status::Success.default_transition(), Some(SUCCESS_TRANSITION));
    assert_eq!(Status::Failure.default_transition(), Some("_error"));
    assert_eq!(Status::Unprocessed.default_transition(), None);
}

#[test]
fn event_log_entry_serializes_with_contract_keys() {
    let mut log = EventLog::new("task");
    log.unsupported("node-a", "_unknown");

    let value = serde_json::to_value(log.operations()[0].clone()).expect("entry serializes");
    assert_eq!(value["task"], json!("task"));
    assert_eq!(value["node"], json!("node-a"));
    assert_eq!(value["status"], json!("UNSUPPORTED_TRANSITION"));
    assert_eq!(value["transition"], json!("_unknown"));
    assert!(value["timestamp"].is_u64());
    assert!(value.get("nodeLog").is_none());
    assert!(value.get("error").is_none());
}

#[test]
fn event_log_tracks_earliest_and_latest_timestamps() {
    let mut log = EventLog::new("task");
    assert_eq!(log.earliest_timestamp(), 0);
    log.node_started("a");
    log.node_started("b");
    assert!(log.earliest_timestamp() <= log.latest_timestamp());
    assert_eq!(
        log.earliest_timestamp(),
        log.operations().iter().map(|entry| entry.timestamp).min().unwrap()
    );
}

#[test]
fn node_status_serializes_screaming_snake_case() {
    assert_eq!(serde_json::to_value(NodeStatus::Success).unwrap(), json!("SUCCESS"));
    assert_eq!(
        serde_json::to_value(NodeStatus::UnsupportedTransition).unwrap(),
        json!("UNSUPPORTED_TRANSITION")
    );
    assert_eq!(serde_json::to_value(NodeStatus::Error).unwrap(), json!("ERROR"));
    assert_eq!(serde_json::to_value(NodeStatus::Unprocessed).unwrap(), json!("UNPROCESSED"));
}
