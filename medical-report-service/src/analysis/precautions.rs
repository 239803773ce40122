use regex::Regex;
use std::sync::LazyLock;

use crate::models::GENERAL_PRECAUTION;

/// One row of the precaution table: any of `keywords`, matched case-insensitively
/// as whole words, yields `advice`.
#[derive(Debug, Clone)]
pub struct PrecautionRule {
    pub condition: &'static str,
    pub advice: &'static str,
    pattern: Regex,
}

impl PrecautionRule {
    pub fn new(
        condition: &'static str,
        keywords: &[&str],
        advice: &'static str,
    ) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;

        Ok(Self {
            condition,
            advice,
            pattern,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

static STANDARD_RULES: LazyLock<Vec<PrecautionRule>> = LazyLock::new(|| {
    [
        (
            "hypertension",
            &["high blood pressure"][..],
            "Maintain a low-sodium diet and monitor blood pressure regularly.",
        ),
        (
            "diabetes",
            &["diabetes"][..],
            "Monitor blood sugar levels, exercise regularly, and follow a balanced diet.",
        ),
        (
            "fracture",
            &["fracture", "broken bone"][..],
            "Rest, avoid weight-bearing activities, and follow up with a specialist.",
        ),
        (
            "cardiovascular",
            &["heart", "cardiovascular"][..],
            "Limit physical exertion, avoid stress, and follow a heart-healthy diet.",
        ),
        (
            "allergy",
            &["allergy"][..],
            "Avoid allergens and keep medications accessible.",
        ),
    ]
    .into_iter()
    .map(|(condition, keywords, advice)| PrecautionRule::new(condition, keywords, advice).unwrap())
    .collect()
});

/// Ordered rule table evaluated against report text. Rules are independent:
/// every matching rule contributes its advice, in table order.
#[derive(Debug, Clone)]
pub struct PrecautionEngine {
    rules: Vec<PrecautionRule>,
}

impl Default for PrecautionEngine {
    fn default() -> Self {
        Self::new(STANDARD_RULES.to_vec())
    }
}

impl PrecautionEngine {
    pub fn new(rules: Vec<PrecautionRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule after the existing ones.
    pub fn with_rule(mut self, rule: PrecautionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[PrecautionRule] {
        &self.rules
    }

    /// Never empty: falls back to general advice when no rule fires.
    pub fn infer(&self, text: &str) -> Vec<String> {
        let mut precautions: Vec<String> = Vec::new();
        for rule in self.rules.iter().filter(|rule| rule.matches(text)) {
            if !precautions.iter().any(|p| p == rule.advice) {
                precautions.push(rule.advice.to_string());
            }
        }

        if precautions.is_empty() {
            precautions.push(GENERAL_PRECAUTION.to_string());
        }
        precautions
    }
}

/// Precautions from the standard table.
pub fn get_precautions(text: &str) -> Vec<String> {
    PrecautionEngine::default().infer(text)
}
