pub mod node;
pub mod registry;
pub mod task;

pub use node::{Node, NodeKind};
pub use registry::TaskRegistry;
pub use task::Task;
