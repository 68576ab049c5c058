mod ocr_space;
mod tesseract;

pub use ocr_space::{OcrSpaceExtractor, OCR_SPACE_DEMO_KEY};
pub use tesseract::TesseractExtractor;

use async_trait::async_trait;
use log::warn;
use std::io::Cursor;
use std::path::PathBuf;

use crate::config::{OcrBackend, OcrConfig};
use crate::error::StageFailure;

/// Represents the source of an image for OCR processing
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(PathBuf),
    /// Image already in memory (e.g. an upload)
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Raw bytes of the image, reading the file if needed
    pub async fn load(&self) -> Result<Vec<u8>, StageFailure> {
        match self {
            ImageSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                StageFailure::TransportError(format!("failed to read {}: {}", path.display(), e))
            }),
            ImageSource::Bytes(data) => Ok(data.clone()),
        }
    }
}

/// Converts one image into recognized text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Backend name for logs (e.g. "tesseract")
    fn backend_name(&self) -> &str;

    /// Recognize text in the image. A single attempt, no retry.
    async fn extract(&self, image: &ImageSource) -> Result<String, StageFailure>;
}

/// Run `extractor` and swallow any failure into an empty string
pub async fn extract_or_empty(extractor: &dyn TextExtractor, image: &ImageSource) -> String {
    match extractor.extract(image).await {
        Ok(text) => text,
        Err(failure) => {
            warn!(
                "Text extraction with {} failed: {}",
                extractor.backend_name(),
                failure
            );
            String::new()
        }
    }
}

/// Create the extractor selected in configuration
pub fn from_config(config: &OcrConfig) -> Box<dyn TextExtractor> {
    match config.backend {
        OcrBackend::Tesseract => Box::new(TesseractExtractor::new(config)),
        OcrBackend::OcrSpace => Box::new(OcrSpaceExtractor::new(config)),
    }
}

/// Decode PNG/JPEG bytes and re-encode them as PNG for the OCR backends
pub(crate) fn to_png(image_data: &[u8]) -> Result<Vec<u8>, StageFailure> {
    let img = image::load_from_memory(image_data)
        .map_err(|e| StageFailure::ParseError(format!("Failed to load image: {}", e)))?;

    let mut png_data = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
        .map_err(|e| StageFailure::ParseError(format!("Failed to convert image: {}", e)))?;

    Ok(png_data)
}
