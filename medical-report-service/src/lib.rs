pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod service;
pub mod summarizer;
pub mod tasks;
pub mod workflow;

pub use config::ServiceConfig;
pub use error::{ConfigError, ExtractError, PipelineError, SummarizeError};
pub use extract::{PageTextReader, PdfPageReader, TextExtractor};
pub use models::*;
pub use service::{AppState, build_router, create_app};
pub use summarizer::{
    OpenRouterSummarizer, SummarizationAdapter, Summarizer, SummaryBounds, SummaryFailurePolicy,
    SummaryRequest,
};
pub use workflow::{ReportPipeline, build_report_workflow};
