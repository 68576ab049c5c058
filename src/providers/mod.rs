mod open_ai;
mod prompt;

pub use open_ai::OpenAiSummarizer;
pub use prompt::{build_summary_request, SUMMARY_SYSTEM_PROMPT};

use async_trait::async_trait;

use crate::config::OpenAiConfig;
use crate::error::StageFailure;

/// Trait for services that condense a synopsis into a short summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Summarize `text`. A single attempt, no retry.
    async fn summarize(&self, text: &str) -> Result<String, StageFailure>;
}

/// Create the summarizer described by configuration
pub fn from_config(config: &OpenAiConfig) -> Box<dyn Summarizer> {
    Box::new(OpenAiSummarizer::new(config))
}
