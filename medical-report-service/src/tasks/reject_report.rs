use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::models::{PipelineState, RejectionReason};

/// Terminal branch for documents that are not medical reports.
pub struct RejectReportTask;

#[async_trait]
impl Task for RejectReportTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let reason = RejectionReason::NotMedicalReport;
        info!(task_id = %self.id(), reason = %reason, "Rejecting document");

        context.set(context_keys::STATE, PipelineState::Rejected).await?;

        Ok(TaskResult::new_with_status(
            Some(reason.to_string()),
            NextAction::End,
            Some("Document rejected".to_string()),
        ))
    }
}
