pub mod classify_report;
pub mod extract_entities;
pub mod extract_sections;
pub mod extract_text;
pub mod infer_precautions;
pub mod reject_report;
pub mod summarize_report;

pub use classify_report::ClassifyReportTask;
pub use extract_entities::ExtractEntitiesTask;
pub use extract_sections::ExtractSectionsTask;
pub use extract_text::ExtractTextTask;
pub use infer_precautions::InferPrecautionsTask;
pub use reject_report::RejectReportTask;
pub use summarize_report::SummarizeReportTask;

/// Keys shared by the pipeline tasks in the flow context
pub mod context_keys {
    pub const DOCUMENT: &str = "document";
    pub const EXTRACTED_TEXT: &str = "extracted_text";
    pub const IS_MEDICAL_REPORT: &str = "is_medical_report";
    pub const PATIENT_INFO: &str = "patient_info";
    pub const SECTIONS: &str = "sections";
    pub const PRECAUTIONS: &str = "precautions";
    pub const SUMMARY: &str = "summary";
    pub const STATE: &str = "pipeline_state";
}
