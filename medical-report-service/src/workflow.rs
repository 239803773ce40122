use report_flow::{Context, Graph, GraphBuilder, Task};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    analysis::PrecautionEngine,
    config::ServiceConfig,
    error::PipelineError,
    extract::TextExtractor,
    models::{
        PatientPhysicianInfo, PipelineOutcome, PipelineResult, PipelineState, RawDocument,
        RejectionReason, SummaryText,
    },
    summarizer::{OpenRouterSummarizer, SummarizationAdapter, SummaryFailurePolicy},
    tasks::*,
};

/// Builds the report graph:
///
/// ```text
/// extract_text -> classify_report -(not medical)-> reject_report
///                                 -(medical)-----> extract_entities -> extract_sections
///                                                  -> infer_precautions -> summarize_report
/// ```
pub fn build_report_workflow(
    extractor: TextExtractor,
    precautions: PrecautionEngine,
    adapter: SummarizationAdapter,
    failure_policy: SummaryFailurePolicy,
) -> Graph {
    let extract_text_task = Arc::new(ExtractTextTask::new(extractor));
    let extract_text_id = extract_text_task.id().to_string();

    let classify_task = Arc::new(ClassifyReportTask);
    let classify_id = classify_task.id().to_string();

    let reject_task = Arc::new(RejectReportTask);
    let reject_id = reject_task.id().to_string();

    let entities_task = Arc::new(ExtractEntitiesTask);
    let entities_id = entities_task.id().to_string();

    let sections_task = Arc::new(ExtractSectionsTask);
    let sections_id = sections_task.id().to_string();

    let precautions_task = Arc::new(InferPrecautionsTask::new(precautions));
    let precautions_id = precautions_task.id().to_string();

    let summarize_task = Arc::new(SummarizeReportTask::new(adapter, failure_policy));
    let summarize_id = summarize_task.id().to_string();

    GraphBuilder::new("medical_report_workflow")
        .add_task(extract_text_task)
        .add_task(classify_task)
        .add_task(reject_task)
        .add_task(entities_task)
        .add_task(sections_task)
        .add_task(precautions_task)
        .add_task(summarize_task)
        .set_start_task(&extract_text_id)
        .add_edge(&extract_text_id, &classify_id)
        .add_conditional_edge(&classify_id, &entities_id, |ctx| {
            ctx.get_sync::<bool>(context_keys::IS_MEDICAL_REPORT)
                .unwrap_or(false)
        })
        .add_edge(&classify_id, &reject_id)
        .add_edge(&entities_id, &sections_id)
        .add_edge(&sections_id, &precautions_id)
        .add_edge(&precautions_id, &summarize_id)
        .build()
}

/// Runs one document through the report graph and turns the context it leaves
/// behind into a [`PipelineOutcome`]. Stateless across calls.
#[derive(Clone)]
pub struct ReportPipeline {
    graph: Arc<Graph>,
}

impl ReportPipeline {
    pub fn new(
        extractor: TextExtractor,
        adapter: SummarizationAdapter,
        failure_policy: SummaryFailurePolicy,
    ) -> Self {
        Self::with_precautions(extractor, PrecautionEngine::default(), adapter, failure_policy)
    }

    /// PDF text layer plus the configured OpenRouter summarizer.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let summarizer = Arc::new(OpenRouterSummarizer::new(
            config.openrouter_api_key.clone(),
            config.summary.model.clone(),
        ));
        let adapter = SummarizationAdapter::new(summarizer)
            .with_bounds(config.summary.bounds)
            .with_timeout(config.summary.timeout)
            .with_max_retries(config.summary.max_retries);

        Self::new(TextExtractor::pdf(), adapter, config.summary.failure_policy)
    }

    pub fn with_precautions(
        extractor: TextExtractor,
        precautions: PrecautionEngine,
        adapter: SummarizationAdapter,
        failure_policy: SummaryFailurePolicy,
    ) -> Self {
        let graph = build_report_workflow(extractor, precautions, adapter, failure_policy);
        Self {
            graph: Arc::new(graph),
        }
    }

    pub async fn process(&self, document: RawDocument) -> PipelineOutcome {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, file_name = ?document.file_name, "Processing report");

        let outcome = match self.run(document).await {
            Ok(outcome) => outcome,
            Err(cause) => {
                error!(run_id = %run_id, error = %cause, "Report processing failed");
                PipelineOutcome::Failed { cause }
            }
        };

        info!(run_id = %run_id, state = ?outcome.state(), "Report processing finished");
        outcome
    }

    async fn run(&self, document: RawDocument) -> Result<PipelineOutcome, PipelineError> {
        let context = Context::new();
        context.set(context_keys::DOCUMENT, document).await?;
        context.set(context_keys::STATE, PipelineState::Received).await?;

        self.graph.execute(context.clone()).await?;

        let state: PipelineState = context.require(context_keys::STATE).await?;
        match state {
            PipelineState::Rejected => Ok(PipelineOutcome::Rejected {
                reason: RejectionReason::NotMedicalReport,
            }),
            PipelineState::Analyzed => Ok(PipelineOutcome::Success(
                Self::assemble_result(&context).await?,
            )),
            _ => Err(PipelineError::Incomplete),
        }
    }

    async fn assemble_result(context: &Context) -> Result<PipelineResult, PipelineError> {
        let info: PatientPhysicianInfo = context.require(context_keys::PATIENT_INFO).await?;
        let summary: SummaryText = context.require(context_keys::SUMMARY).await?;
        let sections: Vec<String> = context.require(context_keys::SECTIONS).await?;
        let precautions: Vec<String> = context.require(context_keys::PRECAUTIONS).await?;

        Ok(PipelineResult {
            is_medical_report: context
                .require(context_keys::IS_MEDICAL_REPORT)
                .await?,
            info,
            summary,
            sections,
            precautions,
        })
    }
}
