//! Build a "series highlights" document from screenshots of TV series titles.
//!
//! Each image goes through four stages: OCR ([`images_to_text`]), title
//! clean-up ([`normalize`]), a TMDB lookup ([`metadata`]) and an optional
//! summary ([`providers`]). The finished records are rendered into a `.docx`
//! file by [`document::assemble`]. Stage failures never abort an item; they
//! become placeholder text in the record.

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod images_to_text;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod placeholders;
pub mod providers;
pub mod server;

pub use builder::HighlightsBuilder;
pub use config::{AppConfig, OcrBackend, SummaryPolicy};
pub use document::{assemble, DOCUMENT_FILENAME, DOCX_MIME};
pub use error::{HighlightsError, StageFailure};
pub use images_to_text::{ImageSource, TextExtractor};
pub use metadata::TmdbResolver;
pub use model::{EpisodeCount, SeriesMetadata, SeriesRecord};
pub use normalize::normalize;
pub use pipelines::{Batch, ItemInput, ItemOutcome, Pipeline};
pub use providers::Summarizer;

use std::path::Path;

/// Run the configured pipeline over image files and write the document.
///
/// # Example
/// ```no_run
/// # use series_highlights::{highlights_from_files, AppConfig};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load()?;
/// let batch = highlights_from_files(config, &["poster.png"], "highlights.docx").await?;
/// println!("{} series written", batch.processed_count());
/// # Ok(())
/// # }
/// ```
pub async fn highlights_from_files<P: AsRef<Path>>(
    config: AppConfig,
    images: &[P],
    output: impl AsRef<Path>,
) -> Result<Batch, HighlightsError> {
    if images.is_empty() {
        return Err(HighlightsError::NoInput);
    }

    let items: Vec<ItemInput> = images
        .iter()
        .map(|path| {
            let path = path.as_ref();
            ItemInput::new(path.display().to_string(), ImageSource::Path(path.to_path_buf()))
        })
        .collect();

    let pipeline = HighlightsBuilder::default().config(config).build();
    let (batch, docx) = pipeline.run(&items).await?;
    tokio::fs::write(output, docx).await?;
    Ok(batch)
}
