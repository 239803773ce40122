use regex::Regex;
use std::sync::LazyLock;

use crate::models::PatientPhysicianInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    PatientName,
    PhysicianName,
}

/// A labelled field: the label, optional whitespace, then the rest of the line.
struct FieldRule {
    field: ReportField,
    pattern: Regex,
}

static FIELD_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule {
            field: ReportField::PatientName,
            pattern: Regex::new(r"Patient Name:\s*(.*)").unwrap(),
        },
        FieldRule {
            field: ReportField::PhysicianName,
            pattern: Regex::new(r"Physician:\s*(.*)").unwrap(),
        },
    ]
});

/// Trimmed value of the first occurrence of `field`.
///
/// A label followed only by whitespace yields `None`, not `Some("")`. This is a
/// deliberate departure from plain capture-and-trim, so downstream rendering shows
/// "Not identified" instead of a blank name.
pub fn extract_field(text: &str, field: ReportField) -> Option<String> {
    let rule = FIELD_RULES.iter().find(|rule| rule.field == field)?;
    let captures = rule.pattern.captures(text)?;
    let value = captures.get(1)?.as_str().trim();

    (!value.is_empty()).then(|| value.to_string())
}

pub fn extract_patient_physician_info(text: &str) -> PatientPhysicianInfo {
    PatientPhysicianInfo {
        patient_name: extract_field(text, ReportField::PatientName),
        physician_name: extract_field(text, ReportField::PhysicianName),
    }
}
