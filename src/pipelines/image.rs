use log::{debug, info, warn};

use super::{ItemInput, ItemOutcome, Pipeline};
use crate::config::SummaryPolicy;
use crate::error::StageFailure;
use crate::images_to_text::extract_or_empty;
use crate::model::SeriesRecord;
use crate::normalize::normalize;
use crate::placeholders;

pub(super) async fn process(
    pipeline: &Pipeline,
    item: &ItemInput,
    policy: SummaryPolicy,
) -> ItemOutcome {
    // 1. OCR
    let extracted = extract_or_empty(pipeline.extractor.as_ref(), &item.image).await;
    debug!("{}: extracted {:?}", item.label, extracted);

    // 2. Clean up into a title, unless the user typed one. A cleared name
    // edit skips the item like an unreadable image does.
    let name_override = item.name_override.as_deref().map(str::trim);
    let title = match name_override {
        Some(name) => name.to_string(),
        None => normalize(&extracted),
    };

    if title.is_empty() {
        info!("{}: no series name, skipping", item.label);
        return ItemOutcome::Skipped {
            label: item.label.clone(),
            extracted,
        };
    }

    // 3. TMDB lookup
    let lookup = pipeline.resolver.resolve(&title).await;
    if let Err(failure) = &lookup {
        warn!("{}: lookup for {:?} failed: {}", item.label, title, failure);
    }
    let mut record = SeriesRecord::from_lookup(&title, lookup);

    if name_override.is_some() {
        record.name = title;
    }
    if let Some(overview) = item.overview_override.as_deref().map(str::trim) {
        record.overview = overview.to_string();
        record.summary = overview.to_string();
    }

    // 4. Summary
    match policy {
        SummaryPolicy::Skip => {
            if record.overview.trim().is_empty() {
                record.summary = placeholders::SUMMARY_NONE.to_string();
            }
        }
        SummaryPolicy::Automatic if record.has_overview() => {
            match pipeline.summarizer.summarize(&record.overview).await {
                Ok(summary) => record.summary = summary,
                Err(failure) => {
                    warn!(
                        "{}: summarization with {} failed: {}",
                        item.label,
                        pipeline.summarizer.provider_name(),
                        failure
                    );
                    record.summary = placeholders::summary_text(&failure).to_string();
                    record.summary_failure = Some(failure);
                }
            }
        }
        SummaryPolicy::Automatic if record.overview.trim().is_empty() => {
            let failure = StageFailure::EmptyInput;
            record.summary = placeholders::summary_text(&failure).to_string();
            record.summary_failure = Some(failure);
        }
        SummaryPolicy::Automatic => {
            debug!("{}: no synopsis to summarize", item.label);
        }
    }

    info!("{}: processed {:?}", item.label, record.name);
    ItemOutcome::Processed(record)
}
