//! Pure, rule-based readers over extracted report text.

pub mod classifier;
pub mod entities;
pub mod precautions;
pub mod sections;

pub use classifier::{MEDICAL_KEYWORDS, is_medical_report, matched_keyword};
pub use entities::{ReportField, extract_field, extract_patient_physician_info};
pub use precautions::{PrecautionEngine, PrecautionRule, get_precautions};
pub use sections::{SECTION_LABELS, extract_report_sections};
