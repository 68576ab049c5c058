mod image;

use log::info;
use serde::Serialize;

use crate::config::SummaryPolicy;
use crate::document;
use crate::error::HighlightsError;
use crate::images_to_text::{ImageSource, TextExtractor};
use crate::metadata::TmdbResolver;
use crate::model::SeriesRecord;
use crate::providers::Summarizer;

/// One uploaded image plus optional manual edits
#[derive(Debug, Clone)]
pub struct ItemInput {
    /// File name or other label used in logs and skip reports
    pub label: String,
    pub image: ImageSource,
    /// Replaces the OCR title for the lookup and the heading; blank skips the item
    pub name_override: Option<String>,
    /// Replaces the TMDB synopsis before summarization; blank means no synopsis
    pub overview_override: Option<String>,
}

impl ItemInput {
    pub fn new(label: impl Into<String>, image: ImageSource) -> Self {
        ItemInput {
            label: label.into(),
            image,
            name_override: None,
            overview_override: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview_override = Some(overview.into());
        self
    }
}

/// Result of running one item through the stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Processed(SeriesRecord),
    /// No usable title; the item contributes nothing to the document
    Skipped { label: String, extracted: String },
}

/// Records in upload order plus the labels of skipped items
#[derive(Debug, Clone, Default, Serialize)]
pub struct Batch {
    pub records: Vec<SeriesRecord>,
    pub skipped: Vec<String>,
}

impl Batch {
    pub fn processed_count(&self) -> usize {
        self.records.len()
    }
}

/// The extract, normalize, resolve and summarize stages wired together
pub struct Pipeline {
    extractor: Box<dyn TextExtractor>,
    resolver: TmdbResolver,
    summarizer: Box<dyn Summarizer>,
    policy: SummaryPolicy,
}

impl Pipeline {
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        resolver: TmdbResolver,
        summarizer: Box<dyn Summarizer>,
        policy: SummaryPolicy,
    ) -> Self {
        Pipeline {
            extractor,
            resolver,
            summarizer,
            policy,
        }
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.policy
    }

    /// Same stages with a different summary policy
    pub fn with_policy(mut self, policy: SummaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one item through every stage. Never fails: stage failures end up
    /// as placeholders in the record.
    pub async fn process_item(&self, item: &ItemInput) -> ItemOutcome {
        image::process(self, item, self.policy).await
    }

    /// Process items one at a time, preserving input order
    pub async fn process_batch(&self, items: &[ItemInput]) -> Batch {
        self.process_batch_with_policy(items, self.policy).await
    }

    /// Like [`Pipeline::process_batch`] but with a per-call summary policy
    pub async fn process_batch_with_policy(
        &self,
        items: &[ItemInput],
        policy: SummaryPolicy,
    ) -> Batch {
        let mut batch = Batch::default();

        for item in items {
            match image::process(self, item, policy).await {
                ItemOutcome::Processed(record) => batch.records.push(record),
                ItemOutcome::Skipped { label, .. } => batch.skipped.push(label),
            }
        }

        info!(
            "Processed {} of {} images ({} skipped)",
            batch.processed_count(),
            items.len(),
            batch.skipped.len()
        );
        batch
    }

    /// Process all items and assemble the document
    pub async fn run(&self, items: &[ItemInput]) -> Result<(Batch, Vec<u8>), HighlightsError> {
        let batch = self.process_batch(items).await;
        let docx = document::assemble(&batch.records)?;
        Ok((batch, docx))
    }
}
