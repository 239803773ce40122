use report_flow::FlowError;
use std::time::Duration;
use thiserror::Error;

/// Failures turning uploaded bytes into text
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read file: {0}")]
    DocumentParse(String),
}

/// The external summarizer could not produce a summary
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarization unavailable: {0}")]
    Unavailable(String),

    #[error("summarization unavailable: no response within {0:?}")]
    Timeout(Duration),
}

impl SummarizeError {
    /// The cause without the "summarization unavailable" prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Unavailable(detail) => detail.clone(),
            Self::Timeout(timeout) => format!("no response within {:?}", timeout),
        }
    }
}

/// Unrecoverable failure of one pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    DocumentParse(#[from] ExtractError),

    #[error(transparent)]
    Summarization(#[from] SummarizeError),

    #[error("pipeline error: {0}")]
    Flow(FlowError),

    #[error("pipeline stopped before producing a result")]
    Incomplete,
}

impl From<FlowError> for PipelineError {
    /// Recover the typed cause a task attached to its failure.
    fn from(error: FlowError) -> Self {
        match error {
            FlowError::TaskExecutionFailed { task_id, source } => {
                let source = match source.downcast::<ExtractError>() {
                    Ok(e) => return Self::DocumentParse(e),
                    Err(source) => source,
                };
                match source.downcast::<SummarizeError>() {
                    Ok(e) => Self::Summarization(e),
                    Err(source) => Self::Flow(FlowError::TaskExecutionFailed { task_id, source }),
                }
            }
            other => Self::Flow(other),
        }
    }
}

/// Invalid service configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("SUMMARY_MIN_LENGTH ({min}) must not exceed SUMMARY_MAX_LENGTH ({max})")]
    LengthBounds { min: usize, max: usize },
}
