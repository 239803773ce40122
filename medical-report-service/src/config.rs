use std::time::Duration;

use crate::{
    error::ConfigError,
    summarizer::{SummaryBounds, SummaryFailurePolicy},
};

pub const DEFAULT_SUMMARY_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const MAX_SUMMARY_RETRIES: u32 = 10;

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub model: String,
    pub bounds: SummaryBounds,
    pub timeout: Duration,
    pub max_retries: u32,
    pub failure_policy: SummaryFailurePolicy,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub openrouter_api_key: String,
    pub max_upload_bytes: usize,
    pub summary: SummaryConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup` so tests need not touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let openrouter_api_key = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("OPENROUTER_API_KEY"))?;

        let bounds = SummaryBounds {
            max_length: parse_or(&lookup, "SUMMARY_MAX_LENGTH", 150)?,
            min_length: parse_or(&lookup, "SUMMARY_MIN_LENGTH", 40)?,
        };
        if bounds.min_length > bounds.max_length {
            return Err(ConfigError::LengthBounds {
                min: bounds.min_length,
                max: bounds.max_length,
            });
        }

        let max_retries: u32 = parse_or(&lookup, "SUMMARY_MAX_RETRIES", 1)?;
        if max_retries > MAX_SUMMARY_RETRIES {
            return Err(ConfigError::Invalid {
                name: "SUMMARY_MAX_RETRIES",
                value: max_retries.to_string(),
            });
        }

        let failure_policy = match lookup("SUMMARY_FAILURE_POLICY") {
            None => SummaryFailurePolicy::default(),
            Some(value) => parse_failure_policy(value)?,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            openrouter_api_key,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            summary: SummaryConfig {
                model: lookup("SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
                bounds,
                timeout: Duration::from_secs(parse_or(&lookup, "SUMMARY_TIMEOUT_SECS", 60)?),
                max_retries,
                failure_policy,
            },
        })
    }
}

fn parse_failure_policy(value: String) -> Result<SummaryFailurePolicy, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "degrade" => Ok(SummaryFailurePolicy::Degrade),
        "fail" => Ok(SummaryFailurePolicy::Fail),
        _ => Err(ConfigError::Invalid {
            name: "SUMMARY_FAILURE_POLICY",
            value,
        }),
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
