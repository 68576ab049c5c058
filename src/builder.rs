use crate::config::{AppConfig, SummaryPolicy};
use crate::images_to_text::{self, TextExtractor};
use crate::metadata::TmdbResolver;
use crate::pipelines::Pipeline;
use crate::providers::{self, Summarizer};

/// Builder for configuring a highlights [`Pipeline`]
///
/// Stages that are not injected explicitly are created from the
/// configuration (or from [`AppConfig::default`] when none is given).
#[derive(Default)]
pub struct HighlightsBuilder {
    config: Option<AppConfig>,
    extractor: Option<Box<dyn TextExtractor>>,
    summarizer: Option<Box<dyn Summarizer>>,
    policy: Option<SummaryPolicy>,
}

impl HighlightsBuilder {
    /// Use an explicit configuration
    ///
    /// # Example
    /// ```
    /// use series_highlights::{AppConfig, HighlightsBuilder};
    ///
    /// let mut config = AppConfig::default();
    /// config.tmdb.api_key = Some("tmdb-key".to_string());
    /// let pipeline = HighlightsBuilder::default().config(config).build();
    /// ```
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom text extractor instead of the configured backend
    pub fn extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Use a custom summarizer instead of OpenAI
    pub fn summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Override the configured summary policy
    ///
    /// # Example
    /// ```
    /// use series_highlights::{HighlightsBuilder, SummaryPolicy};
    ///
    /// let pipeline = HighlightsBuilder::default()
    ///     .policy(SummaryPolicy::Skip)
    ///     .build();
    /// assert_eq!(pipeline.policy(), SummaryPolicy::Skip);
    /// ```
    pub fn policy(mut self, policy: SummaryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Wire the stages together
    pub fn build(self) -> Pipeline {
        let config = self.config.unwrap_or_default();

        let extractor = self
            .extractor
            .unwrap_or_else(|| images_to_text::from_config(&config.ocr));
        let summarizer = self
            .summarizer
            .unwrap_or_else(|| providers::from_config(&config.openai));
        let policy = self.policy.unwrap_or(config.summary_policy);

        Pipeline::new(extractor, TmdbResolver::new(&config.tmdb), summarizer, policy)
    }
}
