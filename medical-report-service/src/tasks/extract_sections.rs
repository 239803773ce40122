use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::analysis::extract_report_sections;

pub struct ExtractSectionsTask;

#[async_trait]
impl Task for ExtractSectionsTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context.require(context_keys::EXTRACTED_TEXT).await?;
        let sections = extract_report_sections(&text);

        info!(task_id = %self.id(), sections = ?sections, "Identified report sections");

        context.set(context_keys::SECTIONS, sections).await?;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
