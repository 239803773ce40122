use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::openrouter,
};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{error::SummarizeError, models::SummaryText};

/// Length bounds for a summary, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 40,
        }
    }
}

/// One call into the summarization capability.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub text: &'a str,
    pub bounds: SummaryBounds,
    /// Always false from the pipeline: output must be deterministic.
    pub do_sample: bool,
}

/// External capability: text in, one condensed summary out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String, SummarizeError>;
}

const SUMMARY_PREAMBLE: &str = "You are a medical AI assistant that condenses clinical reports. \
Reply with the summary text only, in plain prose, without headings or commentary.";

/// Summarizer backed by an OpenRouter chat model.
pub struct OpenRouterSummarizer {
    api_key: String,
    model: String,
}

impl OpenRouterSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn agent(&self, request: &SummaryRequest<'_>) -> Agent<openrouter::CompletionModel> {
        let client = openrouter::Client::new(&self.api_key);
        let temperature = if request.do_sample { 0.7 } else { 0.0 };

        client
            .agent(&self.model)
            .preamble(SUMMARY_PREAMBLE)
            .temperature(temperature)
            .max_tokens((request.bounds.max_length * 2) as u64)
            .build()
    }
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String, SummarizeError> {
        let prompt = format!(
            "Summarize the following medical report in no fewer than {} and no more than {} words.\n\n\
            Medical Report Text:\n{}",
            request.bounds.min_length, request.bounds.max_length, request.text
        );

        let agent = self.agent(&request);
        let response = agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| SummarizeError::Unavailable(e.to_string()))?;

        let summary = response.trim();
        if summary.is_empty() {
            return Err(SummarizeError::Unavailable(
                "model returned an empty summary".to_string(),
            ));
        }
        Ok(summary.to_string())
    }
}

/// What the pipeline does when no summary could be produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFailurePolicy {
    /// Keep the rest of the result and emit a placeholder summary
    #[default]
    Degrade,
    /// Fail the whole request
    Fail,
}

/// Applies the short-input rule, timeout and retry around a [`Summarizer`].
#[derive(Clone)]
pub struct SummarizationAdapter {
    summarizer: Arc<dyn Summarizer>,
    bounds: SummaryBounds,
    timeout: Duration,
    max_retries: u32,
}

impl SummarizationAdapter {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            bounds: SummaryBounds::default(),
            timeout: Duration::from_secs(60),
            max_retries: 1,
        }
    }

    pub fn with_bounds(mut self, bounds: SummaryBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn bounds(&self) -> SummaryBounds {
        self.bounds
    }

    /// `TooShort` below `min_length` words, without calling the summarizer.
    pub async fn summarize(&self, text: &str) -> Result<SummaryText, SummarizeError> {
        let word_count = text.split_whitespace().count();
        if word_count < self.bounds.min_length {
            info!(
                word_count,
                min_length = self.bounds.min_length,
                "Text too short for summarization"
            );
            return Ok(SummaryText::TooShort);
        }

        let request = SummaryRequest {
            text,
            bounds: self.bounds,
            do_sample: false,
        };

        let attempts = self.max_retries.saturating_add(1);
        let mut last_error = SummarizeError::Unavailable("no attempt made".to_string());
        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(self.timeout, self.summarizer.summarize(request))
                .await
                .unwrap_or(Err(SummarizeError::Timeout(self.timeout)));

            match outcome {
                Ok(text) => {
                    info!(word_count, attempt, "Summary generated");
                    return Ok(SummaryText::Generated { text });
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "Summarization attempt failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
