use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::api::fragment::Fragment;
use crate::api::request::FragmentContext;

/// Transition reported by an operation that finished as expected.
pub const SUCCESS_TRANSITION: &str = "_success";
/// Transition used for recovered failures and failed composite reductions.
pub const ERROR_TRANSITION: &str = "_error";

/// Outcome of one operation invocation: the (possibly modified) fragment, the
/// transition label selecting the next edge, and an optional JSON log the
/// operation wants recorded in the event log.
#[derive(Debug, Clone)]
pub struct FragmentResult {
    pub fragment: Fragment,
    pub transition: String,
    pub node_log: Option<Value>,
}

impl FragmentResult {
    pub fn success(fragment: Fragment) -> Self {
        Self::new(fragment, SUCCESS_TRANSITION)
    }

    pub fn error(fragment: Fragment) -> Self {
        Self::new(fragment, ERROR_TRANSITION)
    }

    pub fn new(fragment: Fragment, transition: impl Into<String>) -> Self {
        Self {
            fragment,
            transition: transition.into(),
            node_log: None,
        }
    }

    pub fn with_node_log(mut self, node_log: Value) -> Self {
        self.node_log = Some(node_log);
        self
    }
}

/// Failure raised by an operation instead of a transition.
///
/// Recoverable errors let the engine try the `_error` edge of the failing
/// node; fatal errors abort the whole fragment walk.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("operation failed: {0}")]
    Recoverable(anyhow::Error),
    #[error("operation failed fatally: {0}")]
    Fatal(anyhow::Error),
}

impl OperationError {
    pub fn recoverable(cause: impl Into<anyhow::Error>) -> Self {
        Self::Recoverable(cause.into())
    }

    pub fn fatal(cause: impl Into<anyhow::Error>) -> Self {
        Self::Fatal(cause.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    pub fn cause(&self) -> &anyhow::Error {
        match self {
            Self::Recoverable(cause) | Self::Fatal(cause) => cause,
        }
    }

    pub fn into_cause(self) -> anyhow::Error {
        match self {
            Self::Recoverable(cause) | Self::Fatal(cause) => cause,
        }
    }
}

/// Leaf operation contract. The engine does not know what an operation does;
/// it only invokes it with the current context and routes on the returned
/// transition. Implementations must complete exactly once and classify their
/// own failures as recoverable or fatal.
#[async_trait]
pub trait FragmentOperation: Send + Sync {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, OperationError>;
}

struct FnOperation<F> {
    function: F,
}

#[async_trait]
impl<F, Fut> FragmentOperation for FnOperation<F>
where
    F: Fn(FragmentContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FragmentResult, OperationError>> + Send + 'static,
{
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, OperationError> {
        (self.function)(context).await
    }
}

/// Wraps an async closure as an operation.
pub fn from_fn<F, Fut>(function: F) -> Arc<dyn FragmentOperation>
where
    F: Fn(FragmentContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FragmentResult, OperationError>> + Send + 'static,
{
    Arc::new(FnOperation { function })
}

struct BlockingOperation<F> {
    function: Arc<F>,
}

#[async_trait]
impl<F> FragmentOperation for BlockingOperation<F>
where
    F: Fn(FragmentContext) -> Result<FragmentResult, OperationError> + Send + Sync + 'static,
{
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, OperationError> {
        let function = Arc::clone(&self.function);
        tokio::task::spawn_blocking(move || function(context))
            .await
            .map_err(|join_error| OperationError::fatal(anyhow::Error::from(join_error)))?
    }
}

/// Wraps a synchronous, CPU-bound closure as an operation. The closure runs on
/// the blocking pool so it cannot starve concurrent fragment walks.
pub fn blocking<F>(function: F) -> Arc<dyn FragmentOperation>
where
    F: Fn(FragmentContext) -> Result<FragmentResult, OperationError> + Send + Sync + 'static,
{
    Arc::new(BlockingOperation {
        function: Arc::new(function),
    })
}
