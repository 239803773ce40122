pub mod context;
pub mod error;
pub mod graph;
pub mod task;

// Re-export commonly used types
pub use context::Context;
pub use error::{FlowError, Result};
pub use graph::{ExecutionResult, Graph, GraphBuilder, MAX_STEPS};
pub use task::{NextAction, Task, TaskResult};
