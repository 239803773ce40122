use async_trait::async_trait;
use report_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use tracing::{error, info};

use super::context_keys;
use crate::{
    extract::TextExtractor,
    models::{PipelineState, RawDocument},
};

/// Received → Extracted. Consumes the uploaded bytes.
pub struct ExtractTextTask {
    extractor: TextExtractor,
}

impl ExtractTextTask {
    pub fn new(extractor: TextExtractor) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Task for ExtractTextTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let document: RawDocument = context.require(context_keys::DOCUMENT).await?;
        context.remove(context_keys::DOCUMENT).await;

        info!(
            task_id = %self.id(),
            file_name = ?document.file_name,
            bytes = document.bytes.len(),
            "Extracting text from document"
        );

        let text = self
            .extractor
            .extract_text_blocking(document)
            .await
            .map_err(|e| {
                error!(task_id = %self.id(), error = %e, "Text extraction failed");
                FlowError::task_failed(self.id(), e)
            })?;

        context.set(context_keys::EXTRACTED_TEXT, &text).await?;
        context.set(context_keys::STATE, PipelineState::Extracted).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(format!("Extracted {} characters", text.len())),
        ))
    }
}
