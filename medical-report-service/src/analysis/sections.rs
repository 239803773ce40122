use regex::Regex;
use std::sync::LazyLock;

use crate::models::NO_SECTIONS_SENTINEL;

/// Closed vocabulary of report subsection labels.
pub const SECTION_LABELS: [&str; 5] = [
    "Diagnosis",
    "Prescription",
    "Lab Results",
    "Imaging",
    "Recommendations",
];

static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SECTION_LABELS.iter().map(|l| regex::escape(l)).collect();
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).unwrap()
});

/// Every whole-word label occurrence in order, duplicates kept.
/// Never empty: no match yields the single sentinel entry.
pub fn extract_report_sections(text: &str) -> Vec<String> {
    let sections: Vec<String> = SECTION_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    if sections.is_empty() {
        vec![NO_SECTIONS_SENTINEL.to_string()]
    } else {
        sections
    }
}
