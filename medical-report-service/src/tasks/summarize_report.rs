use async_trait::async_trait;
use report_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use tracing::{error, info, warn};

use super::context_keys;
use crate::{
    models::{PipelineState, SummaryText},
    summarizer::{SummarizationAdapter, SummaryFailurePolicy},
};

/// Last analysis step; marks the run as Analyzed.
pub struct SummarizeReportTask {
    adapter: SummarizationAdapter,
    failure_policy: SummaryFailurePolicy,
}

impl SummarizeReportTask {
    pub fn new(adapter: SummarizationAdapter, failure_policy: SummaryFailurePolicy) -> Self {
        Self {
            adapter,
            failure_policy,
        }
    }
}

#[async_trait]
impl Task for SummarizeReportTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context.require(context_keys::EXTRACTED_TEXT).await?;

        let summary = match self.adapter.summarize(&text).await {
            Ok(summary) => summary,
            Err(e) if self.failure_policy == SummaryFailurePolicy::Degrade => {
                warn!(task_id = %self.id(), error = %e, "Continuing without a summary");
                SummaryText::Unavailable {
                    reason: e.detail(),
                }
            }
            Err(e) => {
                error!(task_id = %self.id(), error = %e, "Summarization failed");
                return Err(FlowError::task_failed(self.id(), e));
            }
        };

        info!(task_id = %self.id(), status = summary.status(), "Summary step finished");

        context.set(context_keys::SUMMARY, &summary).await?;
        context.set(context_keys::STATE, PipelineState::Analyzed).await?;

        Ok(TaskResult::new_with_status(
            Some(summary.to_string()),
            NextAction::End,
            Some("Report analyzed".to_string()),
        ))
    }
}
