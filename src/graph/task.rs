use std::sync::Arc;

use crate::graph::node::Node;

/// The compiled graph governing how one fragment is processed. A task without
/// a root node marks its fragment as unprocessed without invoking anything.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    root: Option<Arc<Node>>,
}

impl Task {
    pub fn new(name: impl Into<String>, root: Node) -> Self {
        Self {
            name: name.into(),
            root: Some(Arc::new(root)),
        }
    }

    pub fn undefined(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_node(&self) -> Option<&Arc<Node>> {
        self.root.as_ref()
    }
}
