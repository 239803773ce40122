use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::analysis::PrecautionEngine;

pub struct InferPrecautionsTask {
    engine: PrecautionEngine,
}

impl InferPrecautionsTask {
    pub fn new(engine: PrecautionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Task for InferPrecautionsTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context.require(context_keys::EXTRACTED_TEXT).await?;
        let precautions = self.engine.infer(&text);

        info!(
            task_id = %self.id(),
            count = precautions.len(),
            "Inferred care precautions"
        );

        context.set(context_keys::PRECAUTIONS, precautions).await?;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
