//! Fixed display strings used whenever a stage could not produce a real value.

use crate::error::StageFailure;

/// Premiere date or episode count that could not be obtained
pub const UNKNOWN: &str = "לא ידוע";

/// Overview when no TMDB key is configured
pub const OVERVIEW_KEY_MISSING: &str = "TMDB API key לא מוגדר";
/// Overview when the search returned nothing
pub const OVERVIEW_NOT_FOUND: &str = "לא נמצא מידע";
/// Overview when the search request or its response failed
pub const OVERVIEW_QUERY_ERROR: &str = "שגיאה בשליפת המידע";
/// Overview when the match carries no synopsis
pub const OVERVIEW_NO_SYNOPSIS: &str = "לא נמצא תקציר";

/// Summary when no OpenAI key is configured
pub const SUMMARY_KEY_MISSING: &str = "OpenAI API key לא מוגדר";
/// Summary requested for empty text
pub const SUMMARY_NOTHING_TO_SUMMARIZE: &str = "אין טקסט לסיכום";
/// Summary request failed
pub const SUMMARY_ERROR: &str = "שגיאה ביצירת תקציר עם OpenAI";
/// Summarization skipped and there was no overview to fall back to
pub const SUMMARY_NONE: &str = "אין תקציר";

/// Overview text shown for a failed lookup
pub fn lookup_overview(failure: &StageFailure) -> &'static str {
    match failure {
        StageFailure::NoCredential => OVERVIEW_KEY_MISSING,
        StageFailure::NoResults | StageFailure::EmptyInput => OVERVIEW_NOT_FOUND,
        StageFailure::TransportError(_) | StageFailure::ParseError(_) => OVERVIEW_QUERY_ERROR,
    }
}

/// Summary text shown for a failed summarization
pub fn summary_text(failure: &StageFailure) -> &'static str {
    match failure {
        StageFailure::NoCredential => SUMMARY_KEY_MISSING,
        StageFailure::EmptyInput => SUMMARY_NOTHING_TO_SUMMARIZE,
        StageFailure::NoResults
        | StageFailure::TransportError(_)
        | StageFailure::ParseError(_) => SUMMARY_ERROR,
    }
}

/// True if `text` is one of the overview placeholders rather than a synopsis
pub fn is_overview_placeholder(text: &str) -> bool {
    matches!(
        text,
        OVERVIEW_KEY_MISSING | OVERVIEW_NOT_FOUND | OVERVIEW_QUERY_ERROR | OVERVIEW_NO_SYNOPSIS
    )
}
