use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::{analysis::matched_keyword, models::PipelineState};

/// Extracted → Classified. The verdict drives the outgoing edges.
pub struct ClassifyReportTask;

#[async_trait]
impl Task for ClassifyReportTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context.require(context_keys::EXTRACTED_TEXT).await?;

        let keyword = matched_keyword(&text);
        let is_medical_report = keyword.is_some();
        info!(
            task_id = %self.id(),
            is_medical_report,
            matched_keyword = ?keyword,
            "Classified document"
        );

        context
            .set(context_keys::IS_MEDICAL_REPORT, is_medical_report)
            .await?;
        context.set(context_keys::STATE, PipelineState::Classified).await?;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
