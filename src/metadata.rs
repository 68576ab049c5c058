use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TmdbConfig;
use crate::error::StageFailure;
use crate::model::SeriesMetadata;

/// Hits stay untyped; only the first one is decoded
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: Option<u64>,
    name: Option<String>,
    overview: Option<String>,
    first_air_date: Option<String>,
    number_of_episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SeriesDetails {
    number_of_episodes: Option<u32>,
}

/// Looks titles up in the TMDB TV search
pub struct TmdbResolver {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: Option<String>,
    fetch_details: bool,
    timeout: Duration,
}

impl TmdbResolver {
    pub fn new(config: &TmdbConfig) -> Self {
        TmdbResolver {
            client: Client::new(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            fetch_details: config.fetch_details,
            timeout: Duration::from_secs(config.timeout),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let config = TmdbConfig {
            api_key,
            base_url,
            ..TmdbConfig::default()
        };
        Self::new(&config)
    }

    /// Whether a TMDB key is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for `title` and map the first hit.
    ///
    /// Only the first result is used; there is no ranking, pagination or caching.
    pub async fn resolve(&self, title: &str) -> Result<SeriesMetadata, StageFailure> {
        let api_key = self.api_key.as_deref().ok_or(StageFailure::NoCredential)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(StageFailure::EmptyInput);
        }

        debug!("Searching TMDB for {:?}", title);

        let mut params = vec![("api_key", api_key), ("query", title)];
        if let Some(language) = self.language.as_deref() {
            params.push(("language", language));
        }

        let response = self
            .client
            .get(format!("{}/3/search/tv", self.base_url))
            .timeout(self.timeout)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StageFailure::TransportError(format!(
                "TMDB search failed with status: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let search: SearchResponse =
            serde_json::from_str(&body).map_err(|e| StageFailure::ParseError(e.to_string()))?;

        let first = search
            .results
            .into_iter()
            .next()
            .ok_or(StageFailure::NoResults)?;
        let hit: SearchHit =
            serde_json::from_value(first).map_err(|e| StageFailure::ParseError(e.to_string()))?;

        let mut episodes = hit.number_of_episodes;
        if episodes.is_none() && self.fetch_details {
            if let Some(id) = hit.id {
                episodes = self.episode_count(api_key, id).await;
            }
        }

        Ok(SeriesMetadata {
            name: non_empty(hit.name),
            overview: non_empty(hit.overview),
            first_air_date: non_empty(hit.first_air_date),
            episodes,
        })
    }

    /// Episode count from the series details endpoint; failures leave it unknown
    async fn episode_count(&self, api_key: &str, id: u64) -> Option<u32> {
        let result = async {
            self.client
                .get(format!("{}/3/tv/{}", self.base_url, id))
                .timeout(self.timeout)
                .query(&[("api_key", api_key)])
                .send()
                .await?
                .error_for_status()?
                .json::<SeriesDetails>()
                .await
        }
        .await;

        match result {
            Ok(details) => details.number_of_episodes,
            Err(e) => {
                warn!("TMDB details lookup for series {} failed: {}", id, e);
                None
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
