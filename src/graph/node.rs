use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::api::operation::{ERROR_TRANSITION, FragmentOperation, SUCCESS_TRANSITION};

/// A vertex in a compiled task graph. Nodes are immutable once built and
/// shared across all concurrent walks and requests.
pub struct Node {
    id: String,
    kind: NodeKind,
    transitions: HashMap<String, Arc<Node>>,
}

pub enum NodeKind {
    /// Wraps one opaque async operation.
    Single(Arc<dyn FragmentOperation>),
    /// Fans out into children executed concurrently, then reduces their
    /// results. Continuations, when declared, win over the transition map.
    Composite {
        children: Vec<Arc<Node>>,
        on_success: Option<Arc<Node>>,
        on_error: Option<Arc<Node>>,
    },
}

impl Node {
    pub fn single(id: impl Into<String>, operation: Arc<dyn FragmentOperation>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Single(operation),
            transitions: HashMap::new(),
        }
    }

    pub fn composite(id: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Composite {
                children: children.into_iter().map(Arc::new).collect(),
                on_success: None,
                on_error: None,
            },
            transitions: HashMap::new(),
        }
    }

    /// Declares an outgoing edge for the given transition label.
    pub fn with_transition(mut self, transition: impl Into<String>, next: Node) -> Self {
        self.transitions.insert(transition.into(), Arc::new(next));
        self
    }

    /// Continuation taken when the node ends with the success transition.
    /// On a composite node this is the post-reduction continuation; on a
    /// single node it is sugar for the `_success` edge.
    pub fn on_success(mut self, next: Node) -> Self {
        match &mut self.kind {
            NodeKind::Composite { on_success, .. } => *on_success = Some(Arc::new(next)),
            NodeKind::Single(_) => {
                self.transitions
                    .insert(SUCCESS_TRANSITION.to_string(), Arc::new(next));
            }
        }
        self
    }

    /// Continuation taken when the node ends with the error transition.
    pub fn on_error(mut self, next: Node) -> Self {
        match &mut self.kind {
            NodeKind::Composite { on_error, .. } => *on_error = Some(Arc::new(next)),
            NodeKind::Single(_) => {
                self.transitions
                    .insert(ERROR_TRANSITION.to_string(), Arc::new(next));
            }
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Resolves the outgoing edge for a transition label. Returns `None` when
    /// no edge matches; the engine decides whether that is a normal terminal
    /// success or an unsupported transition.
    pub fn next(&self, transition: &str) -> Option<&Arc<Node>> {
        if let NodeKind::Composite {
            on_success,
            on_error,
            ..
        } = &self.kind
        {
            let continuation = match transition {
                SUCCESS_TRANSITION => on_success.as_ref(),
                ERROR_TRANSITION => on_error.as_ref(),
                _ => None,
            };
            if continuation.is_some() {
                return continuation;
            }
        }
        self.transitions.get(transition)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            NodeKind::Single(_) => "single",
            NodeKind::Composite { .. } => "composite",
        };
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &kind)
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .finish()
    }
}
