/// Case-sensitive markers of a clinical document.
pub const MEDICAL_KEYWORDS: [&str; 7] = [
    "Patient Name",
    "Physician",
    "Diagnosis",
    "Prescription",
    "Report",
    "Findings",
    "Recommendations",
];

/// First keyword found in `text`, in keyword order.
pub fn matched_keyword(text: &str) -> Option<&'static str> {
    MEDICAL_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| text.contains(keyword))
}

pub fn is_medical_report(text: &str) -> bool {
    matched_keyword(text).is_some()
}
