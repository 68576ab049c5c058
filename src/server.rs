//! HTTP front end: upload images, download the highlights document.
//!
//! `POST /highlights` takes a multipart body where every file part is an
//! image. Text parts named `name` or `overview` edit the image uploaded just
//! before them. `GET /health` answers `{"status":"ok"}`.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::SummaryPolicy;
use crate::document::{self, DOCUMENT_FILENAME, DOCX_MIME};
use crate::error::HighlightsError;
use crate::images_to_text::ImageSource;
use crate::pipelines::{ItemInput, Pipeline};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const PROCESSED_ITEMS: &str = "x-processed-items";
const SKIPPED_ITEMS: &str = "x-skipped-items";

#[derive(Debug, Deserialize)]
struct HighlightsParams {
    /// Overrides the configured summary policy for this request
    summarize: Option<bool>,
}

/// Build the router serving the highlights endpoints
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/highlights", post(create_highlights))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(pipeline)
}

/// Bind `addr` and serve until the process stops
pub async fn serve(pipeline: Pipeline, addr: &str) -> Result<(), HighlightsError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(Arc::new(pipeline))).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_highlights(
    State(pipeline): State<Arc<Pipeline>>,
    Query(params): Query<HighlightsParams>,
    multipart: Multipart,
) -> Response {
    let items = match read_items(multipart).await {
        Ok(items) => items,
        Err(message) => {
            warn!("Rejected upload: {}", message);
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    if items.is_empty() {
        return (StatusCode::BAD_REQUEST, "No images uploaded".to_string()).into_response();
    }

    let policy = match params.summarize {
        Some(true) => SummaryPolicy::Automatic,
        Some(false) => SummaryPolicy::Skip,
        None => pipeline.policy(),
    };

    let batch = pipeline.process_batch_with_policy(&items, policy).await;
    match document::assemble(&batch.records) {
        Ok(docx) => (
            [
                (header::CONTENT_TYPE, DOCX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOCUMENT_FILENAME),
                ),
                (
                    HeaderName::from_static(PROCESSED_ITEMS),
                    batch.processed_count().to_string(),
                ),
                (
                    HeaderName::from_static(SKIPPED_ITEMS),
                    batch.skipped.len().to_string(),
                ),
            ],
            docx,
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to assemble document: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build document").into_response()
        }
    }
}

/// Collect image parts in upload order, attaching `name`/`overview` edits
async fn read_items(mut multipart: Multipart) -> Result<Vec<ItemInput>, String> {
    let mut items: Vec<ItemInput> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let field_name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field.bytes().await.map_err(|e| e.to_string())?;
            let label = if file_name.is_empty() {
                format!("upload-{}", items.len() + 1)
            } else {
                file_name
            };
            items.push(ItemInput::new(label, ImageSource::Bytes(data.to_vec())));
            continue;
        }

        let value = field.text().await.map_err(|e| e.to_string())?;
        let Some(current) = items.last_mut() else {
            return Err(format!("field '{}' must follow an image", field_name));
        };
        match field_name.as_str() {
            "name" => current.name_override = Some(value),
            "overview" => current.overview_override = Some(value),
            other => return Err(format!("unexpected field '{}'", other)),
        }
    }

    Ok(items)
}
