mod context;

pub mod error;
pub mod event_log;
pub mod fragments_engine;
pub mod result;
pub mod task_engine;

pub use error::{ExecutionError, TaskFatalError};
pub use event_log::{EventLog, EventLogEntry, NodeStatus};
pub use fragments_engine::FragmentsEngine;
pub use result::{NodeResult, Status, TaskResult};
pub use task_engine::TaskEngine;

/// Cross-cutting engine settings, resolved once when the engine is built
/// instead of being read from ambient state during execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Emit a trace event with the intermediate result before every node.
    pub trace_results: bool,
}
