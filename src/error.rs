use serde::Serialize;
use thiserror::Error;

/// Errors that abort a highlights run (configuration, I/O, serialization)
#[derive(Error, Debug)]
pub enum HighlightsError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read an input image or write the document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to package the document archive
    #[error("Document archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    /// No images were given
    #[error("No input images provided")]
    NoInput,
}

/// Why a pipeline stage could not produce a real value.
///
/// Stages never raise past the item boundary; they return one of these and
/// the record keeps it next to the placeholder text shown in the document.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StageFailure {
    /// No credential configured for the external service
    #[error("no credential configured")]
    NoCredential,

    /// The stage was given nothing to work on
    #[error("empty input")]
    EmptyInput,

    /// The service answered but had nothing for the query
    #[error("no results")]
    NoResults,

    /// Network, timeout, process spawn or HTTP status failure
    #[error("transport error: {0}")]
    TransportError(String),

    /// The response or input could not be decoded
    #[error("parse error: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for StageFailure {
    fn from(err: reqwest::Error) -> Self {
        // reqwest reports a body read that timed out as a decode error
        if err.is_decode() && !err.is_timeout() {
            StageFailure::ParseError(err.to_string())
        } else {
            StageFailure::TransportError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failure_display() {
        assert_eq!(StageFailure::NoCredential.to_string(), "no credential configured");
        assert_eq!(
            StageFailure::TransportError("timed out".to_string()).to_string(),
            "transport error: timed out"
        );
    }

    #[test]
    fn test_stage_failure_serializes_kind() {
        let json = serde_json::to_value(StageFailure::ParseError("bad json".to_string())).unwrap();
        assert_eq!(json["kind"], "parse_error");
        assert_eq!(json["detail"], "bad json");
    }
}
