use async_trait::async_trait;
use log::{debug, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{to_png, ImageSource, TextExtractor};
use crate::config::OcrConfig;
use crate::error::StageFailure;

/// Local OCR by running the tesseract CLI
pub struct TesseractExtractor {
    command: String,
    languages: String,
    timeout: Duration,
}

impl TesseractExtractor {
    pub fn new(config: &OcrConfig) -> Self {
        let languages = if config.languages.is_empty() {
            "eng".to_string()
        } else {
            config.languages.join("+")
        };

        Self {
            command: config.tesseract_cmd.clone(),
            languages,
            timeout: Duration::from_secs(config.timeout),
        }
    }

    /// Run `tesseract stdin stdout -l <langs>` with the PNG piped in
    async fn run(&self, png: &[u8]) -> Result<String, StageFailure> {
        debug!("Running {} with languages {}", self.command, self.languages);

        let mut child = Command::new(&self.command)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                StageFailure::TransportError(format!(
                    "failed to spawn {}: {}",
                    self.command, e
                ))
            })?;

        // Stdin feed and output collection share one timeout
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(png).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let run = async { tokio::join!(feed, child.wait_with_output()) };

        let (fed, output) = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| StageFailure::TransportError("tesseract timed out".to_string()))?;
        let output =
            output.map_err(|e| StageFailure::TransportError(format!("tesseract failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("tesseract exited with {}: {}", output.status, stderr.trim());
            return Err(StageFailure::TransportError(format!(
                "tesseract exited with {}",
                output.status
            )));
        }

        fed.map_err(|e| {
            StageFailure::TransportError(format!("failed to write image to tesseract: {}", e))
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    fn backend_name(&self) -> &str {
        "tesseract"
    }

    async fn extract(&self, image: &ImageSource) -> Result<String, StageFailure> {
        let png = to_png(&image.load().await?)?;
        self.run(&png).await
    }
}
