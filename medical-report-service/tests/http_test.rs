use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use medical_report_service::{
    AppState, ExtractError, PageTextReader, ReportPipeline, SummarizationAdapter, SummarizeError,
    Summarizer, SummaryFailurePolicy, SummaryRequest, TextExtractor, build_router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "report-boundary";

struct StaticPages(&'static str);

impl PageTextReader for StaticPages {
    fn page_texts(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        Ok(vec![self.0.to_string()])
    }
}

struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, _request: SummaryRequest<'_>) -> Result<String, SummarizeError> {
        Ok("Stable patient.".to_string())
    }
}

fn app_with_limit(page_text: &'static str, max_upload_bytes: usize) -> Router {
    let pipeline = ReportPipeline::new(
        TextExtractor::new(Arc::new(StaticPages(page_text))),
        SummarizationAdapter::new(Arc::new(EchoSummarizer)),
        SummaryFailurePolicy::Degrade,
    );
    build_router(AppState::new(pipeline), max_upload_bytes)
}

fn app(page_text: &'static str) -> Router {
    app_with_limit(page_text, 1024 * 1024)
}

fn multipart_request(field_name: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
        Content-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = app("Report")
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let response = app("Report")
        .oneshot(multipart_request("attachment", "report.pdf", b"%PDF"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file part");
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_name() {
    let response = app("Report")
        .oneshot(multipart_request("file", "notes.txt", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Invalid file type. Please upload a PDF."
    );
}

#[tokio::test]
async fn test_upload_over_body_limit() {
    let response = app_with_limit("Report", 256)
        .oneshot(multipart_request("file", "report.pdf", &[b'x'; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["error"], "File too large");
}

#[tokio::test]
async fn test_upload_medical_report() {
    let response = app("Patient Name: Jane Roe\nPhysician: Dr. Adams\nDiagnosis: allergy")
        .oneshot(multipart_request("file", "report.pdf", b"%PDF-1.4"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["is_medical_report"], true);
    assert_eq!(body["patient_name"], "Jane Roe");
    assert_eq!(body["physician_name"], "Dr. Adams");
    assert_eq!(body["sections"][0], "Diagnosis");
    assert_eq!(
        body["precautions"][0],
        "Avoid allergens and keep medications accessible."
    );
    assert_eq!(body["summary_status"], "too_short");
    assert!(
        body["export_text"]
            .as_str()
            .unwrap()
            .starts_with("Patient Info:\nPatient Name: Jane Roe")
    );
}

#[tokio::test]
async fn test_upload_non_medical_document() {
    let response = app("Grocery list: apples, bread, milk")
        .oneshot(multipart_request("file", "list.pdf", b"%PDF-1.4"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(
        body["reason"],
        "Uploaded file does not appear to be a medical report."
    );
}

#[tokio::test]
async fn test_download_renders_template() {
    let response = app("Report")
        .oneshot(
            Request::get("/download?summary=All%20clear&patient_info=Jane")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"summary.txt\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "Patient Info:\nJane\n\nSummary:\nAll clear\n\nPrecautions:\nNo Precautions Provided"
    );
}
