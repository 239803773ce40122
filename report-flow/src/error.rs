use thiserror::Error;

/// Errors raised while building or executing a task graph
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("graph '{0}' has no start task")]
    MissingStartTask(String),

    #[error("context error: {0}")]
    ContextError(String),

    #[error("task '{task_id}' failed: {source}")]
    TaskExecutionFailed {
        task_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("graph execution exceeded {0} steps")]
    StepLimitExceeded(usize),
}

impl FlowError {
    /// Wrap a task's own error, keeping it downcastable by the caller.
    pub fn task_failed(task_id: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::TaskExecutionFailed {
            task_id: task_id.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
