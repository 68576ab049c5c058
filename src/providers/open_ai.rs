use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::StageFailure;
use crate::providers::{build_summary_request, Summarizer, SUMMARY_SYSTEM_PROMPT};

pub struct OpenAiSummarizer {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiSummarizer {
    /// Create a new OpenAI summarizer from configuration
    pub fn new(config: &OpenAiConfig) -> Self {
        OpenAiSummarizer {
            client: Client::new(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let config = OpenAiConfig {
            api_key,
            base_url,
            ..OpenAiConfig::default()
        };
        Self::new(&config)
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn summarize(&self, text: &str) -> Result<String, StageFailure> {
        if text.trim().is_empty() {
            return Err(StageFailure::EmptyInput);
        }
        let api_key = self.api_key.as_deref().ok_or(StageFailure::NoCredential)?;

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SUMMARY_SYSTEM_PROMPT},
                    {"role": "user", "content": build_summary_request(text)}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StageFailure::TransportError(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let summary = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                StageFailure::ParseError("Failed to extract content from response".to_string())
            })?
            .trim()
            .to_string();

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders;
    use mockito::{Matcher, Server};
    use std::io::Write;

    #[tokio::test]
    async fn test_summarize() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "model": "gpt-4o-mini",
                    "max_tokens": 200
                })),
                Matcher::Regex(SUMMARY_SYSTEM_PROMPT.to_string()),
                Matcher::Regex("A chemistry teacher turns to crime".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": { "content": "  מורה לכימיה הופך לעבריין.\n" }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let summarizer =
            OpenAiSummarizer::with_base_url(Some("fake_api_key".to_string()), server.url());
        let summary = summarizer
            .summarize("A chemistry teacher turns to crime")
            .await
            .unwrap();

        assert_eq!(summary, "מורה לכימיה הופך לעבריין.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_summarize_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let summarizer = OpenAiSummarizer::with_base_url(Some("k".to_string()), server.url());
        let result = summarizer.summarize("text").await;
        assert!(matches!(result, Err(StageFailure::TransportError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_summarize_malformed_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let summarizer = OpenAiSummarizer::with_base_url(Some("k".to_string()), server.url());
        let result = summarizer.summarize("text").await;
        assert!(matches!(result, Err(StageFailure::ParseError(_))));
    }

    #[tokio::test]
    async fn test_no_key_and_empty_input_skip_the_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let without_key = OpenAiSummarizer::with_base_url(None, server.url());
        assert_eq!(
            without_key.summarize("text").await,
            Err(StageFailure::NoCredential)
        );
        assert_eq!(without_key.summarize("").await, Err(StageFailure::EmptyInput));

        let with_key = OpenAiSummarizer::with_base_url(Some("k".to_string()), server.url());
        assert_eq!(with_key.summarize("").await, Err(StageFailure::EmptyInput));
        assert_eq!(with_key.summarize("  \n").await, Err(StageFailure::EmptyInput));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(br#"{"choices": [{"message": {"content": "late"}}]}"#)
            })
            .create_async()
            .await;

        let config = OpenAiConfig {
            api_key: Some("k".to_string()),
            base_url: server.url(),
            timeout: 1,
            ..OpenAiConfig::default()
        };
        let failure = OpenAiSummarizer::new(&config)
            .summarize("A chemistry teacher turns to crime")
            .await
            .unwrap_err();

        assert!(matches!(failure, StageFailure::TransportError(_)));
        assert_eq!(placeholders::summary_text(&failure), placeholders::SUMMARY_ERROR);
    }

    #[test]
    fn test_provider_name() {
        let summarizer = OpenAiSummarizer::new(&OpenAiConfig::default());
        assert_eq!(summarizer.provider_name(), "openai");
    }
}
