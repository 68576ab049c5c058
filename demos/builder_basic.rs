//! Basic usage of the HighlightsBuilder API
//!
//! Run with the images to process, e.g.
//! `cargo run --example builder_basic -- poster1.png poster2.jpg`.
//! Keys are read the same way as the CLI does (`config.toml`,
//! `HIGHLIGHTS__...` or `TMDB_API_KEY` / `OPENAI_API_KEY`).

use series_highlights::{
    AppConfig, HighlightsBuilder, ImageSource, ItemInput, SummaryPolicy, DOCUMENT_FILENAME,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let items: Vec<ItemInput> = std::env::args()
        .skip(1)
        .map(|path| ItemInput::new(path.clone(), ImageSource::Path(path.into())))
        .collect();
    if items.is_empty() {
        eprintln!("usage: builder_basic <IMAGE>...");
        return Ok(());
    }

    // Use Case 1: summarize every series with the configured OpenAI key
    println!("=== Automatic summaries ===");
    let pipeline = HighlightsBuilder::default()
        .config(AppConfig::load()?)
        .build();
    let batch = pipeline.process_batch(&items).await;
    for record in &batch.records {
        println!("{} ({}): {}", record.name, record.first_air_date, record.summary);
    }
    for label in &batch.skipped {
        println!("skipped {}", label);
    }

    // Use Case 2: keep the TMDB synopsis as-is and write the document
    println!("\n=== TMDB synopsis only ===");
    let pipeline = HighlightsBuilder::default()
        .config(AppConfig::load()?)
        .policy(SummaryPolicy::Skip)
        .build();
    let (batch, docx) = pipeline.run(&items).await?;
    tokio::fs::write(DOCUMENT_FILENAME, docx).await?;
    println!(
        "Wrote {} series to {}",
        batch.processed_count(),
        DOCUMENT_FILENAME
    );

    Ok(())
}
