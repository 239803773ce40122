use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, Request, State, multipart::MultipartError,
    },
    http::{HeaderValue, StatusCode, header},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    config::ServiceConfig,
    error::PipelineError,
    export::{EXPORT_FILE_NAME, render_export},
    models::{PipelineOutcome, PipelineResult, RawDocument},
    workflow::ReportPipeline,
};

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, ApiError>;

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn failed_error(status: StatusCode, message: &str, details: &str) -> ApiError {
    (
        status,
        Json(json!({
            "status": "failed",
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReportPipeline>,
}

impl AppState {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_app(config: &ServiceConfig) -> Router {
    let pipeline = ReportPipeline::from_config(config);
    build_router(AppState::new(pipeline), config.max_upload_bytes)
}

pub fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/upload", post(upload_report))
        .route("/download", get(download_summary))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tags every request with an `x-correlation-id` and runs it inside a span carrying it.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Medical Report Summary Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Structured clinical summaries from uploaded PDF medical reports",
        "endpoints": {
            "POST /upload": "Upload a PDF report as multipart field 'file'",
            "GET /download": "Download a plain-text summary (summary, patient_info, precautions)",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn upload_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let document = read_upload(multipart).await?;
    info!(file_name = ?document.file_name, bytes = document.bytes.len(), "Received report upload");

    match state.pipeline.process(document).await {
        PipelineOutcome::Success(result) => Ok(Json(success_body(&result))),
        PipelineOutcome::Rejected { reason } => {
            info!(reason = %reason, "Upload rejected");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "status": "rejected",
                    "reason": reason.to_string()
                })),
            ))
        }
        PipelineOutcome::Failed { cause } => Err(failure_response(&cause)),
    }
}

/// Pulls the `file` field out of the form and checks it names a PDF.
async fn read_upload(mut multipart: Multipart) -> ApiResult<RawDocument> {
    loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;

        let Some(field) = field else {
            return Err(bad_request_error("No file part"));
        };
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        validate_file_name(&file_name)?;

        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(RawDocument::new(Some(file_name), bytes.to_vec()));
    }
}

/// Keeps the status axum assigns, so an oversized body is a 413.
fn multipart_error(e: MultipartError) -> ApiError {
    let status = e.status();
    warn!(error = %e, status = %status, "Failed to read multipart upload");

    let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "File too large"
    } else {
        "Malformed upload"
    };
    (status, Json(json!({ "error": message })))
}

fn validate_file_name(file_name: &str) -> Result<(), ApiError> {
    if file_name.is_empty() {
        return Err(bad_request_error("No selected file"));
    }
    if !file_name.ends_with(".pdf") {
        return Err(bad_request_error("Invalid file type. Please upload a PDF."));
    }
    Ok(())
}

fn success_body(result: &PipelineResult) -> Value {
    json!({
        "status": "success",
        "is_medical_report": result.is_medical_report,
        "patient_name": result.info.patient_name,
        "physician_name": result.info.physician_name,
        "summary": result.summary.to_string(),
        "summary_status": result.summary.status(),
        "sections": result.sections,
        "precautions": result.precautions,
        "export_text": result.to_export_text()
    })
}

fn failure_response(cause: &PipelineError) -> ApiError {
    error!(error = %cause, "Report pipeline failed");
    match cause {
        PipelineError::DocumentParse(_) => failed_error(
            StatusCode::BAD_REQUEST,
            "Could not read file",
            &cause.to_string(),
        ),
        PipelineError::Summarization(_) => failed_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Summarization unavailable",
            &cause.to_string(),
        ),
        PipelineError::Flow(_) | PipelineError::Incomplete => failed_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Report processing failed",
            &cause.to_string(),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub summary: Option<String>,
    pub patient_info: Option<String>,
    pub precautions: Option<String>,
}

async fn download_summary(Query(query): Query<DownloadQuery>) -> impl IntoResponse {
    let content = render_export(
        query
            .patient_info
            .as_deref()
            .unwrap_or("No Patient Info Provided"),
        query.summary.as_deref().unwrap_or("No Summary Provided"),
        query
            .precautions
            .as_deref()
            .unwrap_or("No Precautions Provided"),
    );

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        content,
    )
}
