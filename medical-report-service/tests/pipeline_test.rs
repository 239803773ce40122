use async_trait::async_trait;
use medical_report_service::{
    ExtractError, GENERAL_PRECAUTION, NO_SECTIONS_SENTINEL, PageTextReader, PipelineError,
    PipelineOutcome, PipelineState, RawDocument, RejectionReason, ReportPipeline,
    SummarizationAdapter, SummarizeError, Summarizer, SummaryFailurePolicy, SummaryRequest,
    SummaryText, TextExtractor,
    analysis::PrecautionEngine,
    build_report_workflow,
    tasks::{
        ClassifyReportTask, ExtractEntitiesTask, ExtractSectionsTask, ExtractTextTask,
        InferPrecautionsTask, RejectReportTask, context_keys,
    },
};
use report_flow::{Context, Task};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

const HYPERTENSION_ADVICE: &str = "Maintain a low-sodium diet and monitor blood pressure regularly.";
const DIABETES_ADVICE: &str =
    "Monitor blood sugar levels, exercise regularly, and follow a balanced diet.";
const FRACTURE_ADVICE: &str =
    "Rest, avoid weight-bearing activities, and follow up with a specialist.";

struct StaticPages(Vec<String>);

impl StaticPages {
    fn extractor(pages: &[&str]) -> TextExtractor {
        TextExtractor::new(Arc::new(Self(
            pages.iter().map(|p| p.to_string()).collect(),
        )))
    }
}

impl PageTextReader for StaticPages {
    fn page_texts(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        Ok(self.0.clone())
    }
}

/// Records how often it was asked and either echoes a canned summary or fails.
struct CountingSummarizer {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingSummarizer {
    fn working() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn broken() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, _request: SummaryRequest<'_>) -> Result<String, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SummarizeError::Unavailable("model offline".to_string()));
        }
        Ok("Patient with hypertension and diabetes on lifestyle management.".to_string())
    }
}

fn pipeline(
    pages: &[&str],
    summarizer: Arc<CountingSummarizer>,
    policy: SummaryFailurePolicy,
) -> ReportPipeline {
    let adapter = SummarizationAdapter::new(summarizer).with_max_retries(0);
    ReportPipeline::new(StaticPages::extractor(pages), adapter, policy)
}

fn upload() -> RawDocument {
    RawDocument::new(Some("report.pdf".to_string()), b"%PDF-1.4".to_vec())
}

fn long_report() -> String {
    let mut text = String::from(
        "Patient Name: John Doe\nPhysician: Dr. Smith\nDiagnosis: high blood pressure and diabetes.\n",
    );
    text.push_str(&vec!["The patient reports stable symptoms this week."; 8].join(" "));
    text
}

#[tokio::test]
async fn test_short_report_is_analyzed_without_summary() {
    let summarizer = CountingSummarizer::working();
    let pipeline = pipeline(
        &["Patient Name: John Doe\nPhysician: Dr. Smith\n", "Diagnosis: high blood pressure and diabetes."],
        summarizer.clone(),
        SummaryFailurePolicy::Degrade,
    );

    let outcome = pipeline.process(upload()).await;
    assert_eq!(outcome.state(), PipelineState::Analyzed);

    let result = outcome.result().expect("analyzed result");
    assert!(result.is_medical_report);
    assert_eq!(result.info.patient_name.as_deref(), Some("John Doe"));
    assert_eq!(result.info.physician_name.as_deref(), Some("Dr. Smith"));
    assert_eq!(result.sections, vec!["Diagnosis".to_string()]);
    assert_eq!(
        result.precautions,
        vec![HYPERTENSION_ADVICE.to_string(), DIABETES_ADVICE.to_string()]
    );
    assert_eq!(result.summary, SummaryText::TooShort);
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_long_report_gets_generated_summary() {
    let summarizer = CountingSummarizer::working();
    let text = long_report();
    let pipeline = pipeline(&[&text], summarizer.clone(), SummaryFailurePolicy::Degrade);

    let outcome = pipeline.process(upload()).await;
    let result = outcome.result().expect("analyzed result");

    assert!(result.summary.is_generated());
    assert_eq!(summarizer.calls(), 1);

    let export = result.to_export_text();
    assert!(export.starts_with("Patient Info:\nPatient Name: John Doe\nPhysician: Dr. Smith"));
    assert!(export.contains(&format!("- {}", HYPERTENSION_ADVICE)));
}

#[tokio::test]
async fn test_non_medical_document_is_rejected_before_analysis() {
    let summarizer = CountingSummarizer::working();
    let pipeline = pipeline(
        &["Quarterly sales grew by four percent across all regions."],
        summarizer.clone(),
        SummaryFailurePolicy::Degrade,
    );

    let outcome = pipeline.process(upload()).await;

    assert_eq!(outcome.state(), PipelineState::Rejected);
    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected {
            reason: RejectionReason::NotMedicalReport
        }
    ));
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_rejected_run_skips_every_analysis_task() {
    let summarizer = CountingSummarizer::working();
    let graph = build_report_workflow(
        StaticPages::extractor(&["Quarterly sales grew by four percent across all regions."]),
        PrecautionEngine::default(),
        SummarizationAdapter::new(summarizer.clone()),
        SummaryFailurePolicy::Degrade,
    );

    let context = Context::new();
    context.set(context_keys::DOCUMENT, upload()).await.unwrap();
    context
        .set(context_keys::STATE, PipelineState::Received)
        .await
        .unwrap();

    let execution = graph.execute(context.clone()).await.unwrap();

    let extract_text = ExtractTextTask::new(StaticPages::extractor(&[]));
    assert_eq!(
        execution.visited,
        vec![
            extract_text.id().to_string(),
            ClassifyReportTask.id().to_string(),
            RejectReportTask.id().to_string(),
        ]
    );
    for skipped in [
        ExtractEntitiesTask.id(),
        ExtractSectionsTask.id(),
        InferPrecautionsTask::new(PrecautionEngine::default()).id(),
    ] {
        assert!(!execution.visited.iter().any(|id| id == skipped));
    }

    assert!(!context.contains(context_keys::PATIENT_INFO).await);
    assert!(!context.contains(context_keys::SECTIONS).await);
    assert!(!context.contains(context_keys::PRECAUTIONS).await);
    assert!(!context.contains(context_keys::SUMMARY).await);
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_bare_keyword_yields_sentinels() {
    let pipeline = pipeline(
        &["Report"],
        CountingSummarizer::working(),
        SummaryFailurePolicy::Degrade,
    );

    let outcome = pipeline.process(upload()).await;
    let result = outcome.result().expect("analyzed result");

    assert_eq!(result.info.patient_name, None);
    assert_eq!(result.info.physician_name, None);
    assert_eq!(result.sections, vec![NO_SECTIONS_SENTINEL.to_string()]);
    assert_eq!(result.precautions, vec![GENERAL_PRECAUTION.to_string()]);
}

#[tokio::test]
async fn test_document_without_pages_is_rejected() {
    let pipeline = pipeline(&[], CountingSummarizer::working(), SummaryFailurePolicy::Degrade);

    let outcome = pipeline.process(upload()).await;
    assert_eq!(outcome.state(), PipelineState::Rejected);
}

#[tokio::test]
async fn test_degrade_policy_keeps_partial_result() {
    let summarizer = CountingSummarizer::broken();
    let text = long_report();
    let pipeline = pipeline(&[&text], summarizer.clone(), SummaryFailurePolicy::Degrade);

    let outcome = pipeline.process(upload()).await;
    let result = outcome.result().expect("degraded result");

    assert_eq!(
        result.summary,
        SummaryText::Unavailable {
            reason: "model offline".to_string()
        }
    );
    assert_eq!(result.summary.to_string(), "Summary unavailable: model offline");
    assert_eq!(result.sections, vec!["Diagnosis".to_string()]);
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_fail_policy_surfaces_summarization_error() {
    let text = long_report();
    let pipeline = pipeline(
        &[&text],
        CountingSummarizer::broken(),
        SummaryFailurePolicy::Fail,
    );

    let outcome = pipeline.process(upload()).await;

    assert_eq!(outcome.state(), PipelineState::Failed);
    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            cause: PipelineError::Summarization(_)
        }
    ));
}

#[tokio::test]
async fn test_pipeline_is_reusable_across_documents() {
    let summarizer = CountingSummarizer::working();
    let pipeline = pipeline(&["Report"], summarizer, SummaryFailurePolicy::Degrade);

    let first = pipeline.process(upload()).await;
    let second = pipeline.process(upload()).await;

    assert_eq!(first.result(), second.result());
}

#[tokio::test]
async fn test_unparseable_pdf_fails_with_parse_error() {
    let adapter = SummarizationAdapter::new(CountingSummarizer::working());
    let pipeline = ReportPipeline::new(TextExtractor::pdf(), adapter, SummaryFailurePolicy::Degrade);

    let document = RawDocument::new(
        Some("broken.pdf".to_string()),
        b"this is not a pdf at all".to_vec(),
    );
    let outcome = pipeline.process(document).await;

    match outcome {
        PipelineOutcome::Failed {
            cause: PipelineError::DocumentParse(ExtractError::DocumentParse(message)),
        } => assert!(!message.is_empty()),
        other => panic!("expected a parse failure, got {:?}", other.state()),
    }
}

/// Single-page PDF with one line of Helvetica text.
fn make_test_pdf(text: &str) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = format!("BT /F1 12 Tf 72 700 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });

    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        page.set("Parent", pages_id);
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn test_digital_pdf_end_to_end() {
    let summarizer = CountingSummarizer::working();
    let adapter = SummarizationAdapter::new(summarizer.clone());
    let pipeline = ReportPipeline::new(TextExtractor::pdf(), adapter, SummaryFailurePolicy::Degrade);

    let bytes = make_test_pdf("Diagnosis: closed fracture of the left wrist");
    let outcome = pipeline
        .process(RawDocument::new(Some("wrist.pdf".to_string()), bytes))
        .await;

    let result = outcome.result().expect("digital PDF should be analyzed");
    assert!(result.sections.iter().any(|s| s == "Diagnosis"));
    assert!(result.precautions.iter().any(|p| p == FRACTURE_ADVICE));
    assert_eq!(result.summary, SummaryText::TooShort);
    assert_eq!(summarizer.calls(), 0);
}
