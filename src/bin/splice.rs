use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use splice::api::operation::{self, FragmentResult, OperationError};
use splice::api::{ClientRequest, Fragment, FragmentContext};
use splice::engine::{EngineConfig, FragmentsEngine};
use splice::graph::{Node, Task};
use tracing::info;

/// Demo: assembles a two-fragment page. The first fragment fans out into two
/// parallel lookups and joins them into the body; the second runs a single
/// transformation.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let fetch_user = operation::from_fn(|context: FragmentContext| async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let mut fragment = context.fragment;
        fragment.append_payload("user", json!({ "name": "alice" }));
        Ok(FragmentResult::success(fragment))
    });
    let fetch_offers = operation::from_fn(|context: FragmentContext| async move {
        let mut fragment = context.fragment;
        fragment.append_payload("offers", json!(["premium", "trial"]));
        Ok(FragmentResult::success(fragment))
    });
    let render = operation::from_fn(|context: FragmentContext| async move {
        let mut fragment = context.fragment;
        let body =
            serde_json::to_string(fragment.payload()).map_err(OperationError::recoverable)?;
        fragment.set_body(body);
        Ok(FragmentResult::success(fragment))
    });
    let uppercase = operation::blocking(|context: FragmentContext| {
        let mut fragment = context.fragment;
        let body = fragment.body().to_uppercase();
        fragment.set_body(body);
        Ok(FragmentResult::success(fragment))
    });

    let profile_task = Task::new(
        "profile",
        Node::composite(
            "lookups",
            vec![
                Node::single("fetch-user", fetch_user),
                Node::single("fetch-offers", fetch_offers),
            ],
        )
        .on_success(Node::single("render", render)),
    );
    let banner_task = Task::new("banner", Node::single("uppercase", uppercase));

    let client_request = Arc::new(ClientRequest::new("GET", "/profile"));
    let fragments = vec![
        (
            profile_task,
            FragmentContext::new(
                Fragment::new("snippet", json!({}), ""),
                Arc::clone(&client_request),
            ),
        ),
        (
            banner_task,
            FragmentContext::new(
                Fragment::new("snippet", json!({}), "welcome back"),
                client_request,
            ),
        ),
    ];

    let engine = FragmentsEngine::with_config(EngineConfig {
        trace_results: true,
    });
    let results = engine.execute(fragments).await?;

    for result in &results {
        info!(
            fragment = %result.fragment().id(),
            status = ?result.status(),
            body = %result.fragment().body(),
            "fragment processed"
        );
        println!("{}", serde_json::to_string_pretty(result.log())?);
    }
    Ok(())
}
