use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::fragment::Fragment;

/// Read-only view of the client request that triggered fragment processing.
/// Operations may inspect it but the engine never mutates it, so one instance
/// is shared across all concurrent walks of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
}

impl ClientRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }
}

/// Input handed to every operation invocation: the current fragment snapshot
/// plus the originating client request.
#[derive(Debug, Clone)]
pub struct FragmentContext {
    pub fragment: Fragment,
    pub client_request: Arc<ClientRequest>,
}

impl FragmentContext {
    pub fn new(fragment: Fragment, client_request: Arc<ClientRequest>) -> Self {
        Self {
            fragment,
            client_request,
        }
    }
}
