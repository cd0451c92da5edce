#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use serde_json::{Value, json};
use splice::api::operation::{self, FragmentOperation, FragmentResult, OperationError};
use splice::api::{ClientRequest, Fragment, FragmentContext};

pub fn new_fragment(body: &str) -> Fragment {
    Fragment::new("snippet", json!({}), body)
}

pub fn new_context(fragment: Fragment) -> FragmentContext {
    FragmentContext::new(fragment, Arc::new(ClientRequest::new("GET", "/")))
}

pub fn success() -> Arc<dyn FragmentOperation> {
    operation::from_fn(|context: FragmentContext| async move {
        Ok(FragmentResult::success(context.fragment))
    })
}

pub fn success_with_delay(delay_ms: u64) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(FragmentResult::success(context.fragment))
    })
}

pub fn success_with_node_log(node_log: Value) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| {
        let node_log = node_log.clone();
        async move { Ok(FragmentResult::success(context.fragment).with_node_log(node_log)) }
    })
}

pub fn error_with_node_log(node_log: Value) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| {
        let node_log = node_log.clone();
        async move { Ok(FragmentResult::error(context.fragment).with_node_log(node_log)) }
    })
}

pub fn custom_transition(transition: &'static str) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| async move {
        Ok(FragmentResult::new(context.fragment, transition))
    })
}

pub fn failure() -> Arc<dyn FragmentOperation> {
    operation::from_fn(|_context: FragmentContext| async move {
        Err(OperationError::recoverable(anyhow!("operation blew up")))
    })
}

pub fn fatal() -> Arc<dyn FragmentOperation> {
    operation::from_fn(|_context: FragmentContext| async move {
        Err(OperationError::fatal(anyhow!("operation blew up fatally")))
    })
}

pub fn append_payload(key: &'static str, value: Value) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| {
        let value = value.clone();
        async move {
            let mut fragment = context.fragment;
            fragment.append_payload(key, value);
            Ok(FragmentResult::success(fragment))
        }
    })
}

pub fn append_body(postfix: &'static str) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| async move {
        let mut fragment = context.fragment;
        let body = format!("{}{}", fragment.body(), postfix);
        fragment.set_body(body);
        Ok(FragmentResult::success(fragment))
    })
}

pub fn set_body(body: &'static str) -> Arc<dyn FragmentOperation> {
    operation::from_fn(move |context: FragmentContext| async move {
        let mut fragment = context.fragment;
        fragment.set_body(body);
        Ok(FragmentResult::success(fragment))
    })
}
