use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

pub const TOO_SHORT_SENTINEL: &str = "Text too short for summarization.";
pub const NO_SECTIONS_SENTINEL: &str = "No specific report sections identified.";
pub const GENERAL_PRECAUTION: &str =
    "General advice: Follow your physician's recommendations carefully.";

/// Uploaded PDF bytes, held only for the duration of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub file_name: Option<String>,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPhysicianInfo {
    pub patient_name: Option<String>,
    pub physician_name: Option<String>,
}

/// Narrative summary, or why there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryText {
    Generated { text: String },
    TooShort,
    Unavailable { reason: String },
}

impl SummaryText {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::TooShort => "too_short",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

impl fmt::Display for SummaryText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated { text } => f.write_str(text),
            Self::TooShort => f.write_str(TOO_SHORT_SENTINEL),
            Self::Unavailable { reason } => write!(f, "Summary unavailable: {}", reason),
        }
    }
}

/// Structured summary of one accepted medical report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub is_medical_report: bool,
    pub info: PatientPhysicianInfo,
    pub summary: SummaryText,
    pub sections: Vec<String>,
    pub precautions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Received,
    Extracted,
    Classified,
    Rejected,
    Analyzed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NotMedicalReport,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMedicalReport => {
                f.write_str("Uploaded file does not appear to be a medical report.")
            }
        }
    }
}

/// Terminal outcome of a pipeline run
#[derive(Debug)]
pub enum PipelineOutcome {
    Success(PipelineResult),
    Rejected { reason: RejectionReason },
    Failed { cause: PipelineError },
}

impl PipelineOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            Self::Success(_) => PipelineState::Analyzed,
            Self::Rejected { .. } => PipelineState::Rejected,
            Self::Failed { .. } => PipelineState::Failed,
        }
    }

    pub fn result(&self) -> Option<&PipelineResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }
}
