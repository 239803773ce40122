use crate::models::{PatientPhysicianInfo, PipelineResult};

pub const EXPORT_FILE_NAME: &str = "summary.txt";

const NOT_IDENTIFIED: &str = "Not identified";

/// The three-section plain-text export.
pub fn render_export(patient_info: &str, summary: &str, precautions: &str) -> String {
    format!(
        "Patient Info:\n{}\n\nSummary:\n{}\n\nPrecautions:\n{}",
        patient_info, summary, precautions
    )
}

pub fn format_patient_info(info: &PatientPhysicianInfo) -> String {
    format!(
        "Patient Name: {}\nPhysician: {}",
        info.patient_name.as_deref().unwrap_or(NOT_IDENTIFIED),
        info.physician_name.as_deref().unwrap_or(NOT_IDENTIFIED)
    )
}

pub fn format_precautions(precautions: &[String]) -> String {
    precautions
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

impl PipelineResult {
    pub fn to_export_text(&self) -> String {
        render_export(
            &format_patient_info(&self.info),
            &self.summary.to_string(),
            &format_precautions(&self.precautions),
        )
    }
}
