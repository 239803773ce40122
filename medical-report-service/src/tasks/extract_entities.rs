use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::analysis::extract_patient_physician_info;

pub struct ExtractEntitiesTask;

#[async_trait]
impl Task for ExtractEntitiesTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context.require(context_keys::EXTRACTED_TEXT).await?;
        let info = extract_patient_physician_info(&text);

        info!(
            task_id = %self.id(),
            has_patient = info.patient_name.is_some(),
            has_physician = info.physician_name.is_some(),
            "Extracted patient and physician fields"
        );

        context.set(context_keys::PATIENT_INFO, info).await?;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
