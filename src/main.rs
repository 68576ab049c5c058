use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use series_highlights::{
    server, AppConfig, HighlightsBuilder, HighlightsError, ImageSource, ItemInput, OcrBackend,
    SummaryPolicy, DOCUMENT_FILENAME,
};

#[derive(Parser)]
#[command(name = "series-highlights")]
#[command(about = "Turn screenshots of TV series titles into a highlights document")]
#[command(version)]
struct Cli {
    /// Use the OCR.space service instead of the local tesseract binary
    #[arg(long, global = true)]
    remote_ocr: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process image files and write the document
    Process {
        /// Images to process, in order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = DOCUMENT_FILENAME)]
        output: PathBuf,

        /// Series name to use instead of the OCR result, matched to images by position
        #[arg(long = "name")]
        names: Vec<String>,

        /// Do not call the summarizer; use the TMDB synopsis as-is
        #[arg(long)]
        no_summary: bool,

        /// Print the processed records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the upload/download HTTP endpoint
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), HighlightsError> {
    let mut config = AppConfig::load()?;
    if cli.remote_ocr {
        config.ocr.backend = OcrBackend::OcrSpace;
    }

    match cli.command {
        Commands::Process {
            images,
            output,
            names,
            no_summary,
            json,
        } => {
            let items: Vec<ItemInput> = images
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let item = ItemInput::new(
                        path.display().to_string(),
                        ImageSource::Path(path.clone()),
                    );
                    match names.get(i) {
                        Some(name) => item.with_name(name.clone()),
                        None => item,
                    }
                })
                .collect();

            let mut builder = HighlightsBuilder::default().config(config);
            if no_summary {
                builder = builder.policy(SummaryPolicy::Skip);
            }
            let pipeline = builder.build();

            let (batch, docx) = pipeline.run(&items).await?;
            tokio::fs::write(&output, docx).await?;

            if json {
                match serde_json::to_string_pretty(&batch) {
                    Ok(report) => println!("{}", report),
                    Err(e) => error!("Failed to serialize report: {}", e),
                }
            }
            for label in &batch.skipped {
                info!("Skipped {} (no text recognized)", label);
            }
            info!(
                "Wrote {} with {} series to {}",
                DOCUMENT_FILENAME,
                batch.processed_count(),
                output.display()
            );
            Ok(())
        }
        Commands::Serve { host, port } => {
            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let pipeline = HighlightsBuilder::default().config(config).build();
            server::serve(pipeline, &addr).await
        }
    }
}
