use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{to_png, ImageSource, TextExtractor};
use crate::config::OcrConfig;
use crate::error::StageFailure;

/// Public demo key accepted by OCR.space with a low rate limit
pub const OCR_SPACE_DEMO_KEY: &str = "helloworld";

/// Remote OCR through the OCR.space REST API
pub struct OcrSpaceExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
    timeout: Duration,
}

impl OcrSpaceExtractor {
    /// Create a new extractor from configuration
    pub fn new(config: &OcrConfig) -> Self {
        OcrSpaceExtractor {
            client: Client::new(),
            api_key: config
                .api_key
                .clone()
                .unwrap_or_else(|| OCR_SPACE_DEMO_KEY.to_string()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.languages.join(","),
            timeout: Duration::from_secs(config.timeout),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OcrConfig {
            api_key: Some(api_key),
            base_url,
            ..OcrConfig::default()
        };
        Self::new(&config)
    }

    /// Calls the OCR.space API with base64-encoded PNG data
    async fn call_ocr_space(&self, base64_png: &str) -> Result<String, StageFailure> {
        let data_uri = format!("data:image/png;base64,{}", base64_png);
        let form = [
            ("apikey", self.api_key.as_str()),
            ("language", self.language.as_str()),
            ("base64Image", data_uri.as_str()),
        ];

        debug!("Sending OCR request to OCR.space");

        let response = self
            .client
            .post(format!("{}/parse/image", self.base_url))
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StageFailure::TransportError(format!(
                "OCR.space error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("OCR.space response: {:?}", response_body);

        if response_body["IsErroredOnProcessing"].as_bool() == Some(true) {
            return Err(StageFailure::ParseError(format!(
                "OCR.space could not process the image: {}",
                response_body["ErrorMessage"]
            )));
        }

        let text = response_body["ParsedResults"][0]["ParsedText"]
            .as_str()
            .ok_or_else(|| StageFailure::ParseError("No ParsedText in response".to_string()))?
            .to_string();

        debug!("Extracted text from image: {} characters", text.len());

        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for OcrSpaceExtractor {
    fn backend_name(&self) -> &str {
        "ocr_space"
    }

    async fn extract(&self, image: &ImageSource) -> Result<String, StageFailure> {
        let png = to_png(&image.load().await?)?;
        self.call_ocr_space(&STANDARD.encode(png)).await
    }
}
