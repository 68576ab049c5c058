use serde::Serialize;
use std::fmt;

use crate::error::StageFailure;
use crate::placeholders;

/// Episode count of a series, or unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeCount {
    Count(u32),
    Unknown,
}

impl Serialize for EpisodeCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EpisodeCount::Count(n) => serializer.serialize_u32(*n),
            EpisodeCount::Unknown => serializer.serialize_str(placeholders::UNKNOWN),
        }
    }
}

impl From<Option<u32>> for EpisodeCount {
    fn from(count: Option<u32>) -> Self {
        count.map_or(EpisodeCount::Unknown, EpisodeCount::Count)
    }
}

impl fmt::Display for EpisodeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeCount::Count(n) => write!(f, "{}", n),
            EpisodeCount::Unknown => f.write_str(placeholders::UNKNOWN),
        }
    }
}

/// Fields taken from the first TMDB search hit.
/// `None` means the field was absent from the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesMetadata {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub episodes: Option<u32>,
}

/// One finished entry of the highlights document.
///
/// Every display field holds either a real value or a placeholder, so the
/// document assembler never has to deal with missing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRecord {
    pub name: String,
    pub overview: String,
    pub first_air_date: String,
    pub episodes: EpisodeCount,
    pub summary: String,
    /// Why the overview/date/episodes are placeholders, if they are
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_failure: Option<StageFailure>,
    /// Why the summary is a placeholder, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_failure: Option<StageFailure>,
}

impl SeriesRecord {
    /// Build a record from a lookup outcome, with the summary still unset.
    ///
    /// The summary starts out as the overview; the pipeline replaces it once
    /// the summary policy has run.
    pub fn from_lookup(title: &str, lookup: Result<SeriesMetadata, StageFailure>) -> Self {
        match lookup {
            Ok(meta) => {
                let overview = meta
                    .overview
                    .unwrap_or_else(|| placeholders::OVERVIEW_NO_SYNOPSIS.to_string());
                SeriesRecord {
                    name: meta.name.unwrap_or_else(|| title.to_string()),
                    summary: overview.clone(),
                    overview,
                    first_air_date: meta
                        .first_air_date
                        .unwrap_or_else(|| placeholders::UNKNOWN.to_string()),
                    episodes: meta.episodes.into(),
                    lookup_failure: None,
                    summary_failure: None,
                }
            }
            Err(failure) => {
                let overview = placeholders::lookup_overview(&failure).to_string();
                SeriesRecord {
                    name: title.to_string(),
                    summary: overview.clone(),
                    overview,
                    first_air_date: placeholders::UNKNOWN.to_string(),
                    episodes: EpisodeCount::Unknown,
                    lookup_failure: Some(failure),
                    summary_failure: None,
                }
            }
        }
    }

    /// True when the overview is real text (resolved or user-edited)
    pub fn has_overview(&self) -> bool {
        !self.overview.trim().is_empty() && !placeholders::is_overview_placeholder(&self.overview)
    }
}
