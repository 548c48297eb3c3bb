//! Request handlers.

use axum::Form;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::io::ErrorKind;
use tracing::{error, info, warn};

use crate::pipeline::SearchRequest;
use crate::web::AppState;
use crate::web::views::{FormValues, index_page, results_page};

/// Raw search form. Every field is optional so missing values surface as
/// validation errors rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeForm {
    pub keyword: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub logic: Option<String>,
}

/// GET / - the empty search form.
pub async fn index() -> Html<String> {
    Html(index_page(None, &FormValues::default()))
}

/// POST /scrape - validates the form, runs a search and renders results.
pub async fn scrape(State(state): State<AppState>, Form(form): Form<ScrapeForm>) -> Html<String> {
    let request = match SearchRequest::parse(
        form.keyword.as_deref(),
        form.start_date.as_deref(),
        form.end_date.as_deref(),
        form.logic.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected search form");
            let values = FormValues {
                keyword: form.keyword.as_deref().unwrap_or_default(),
                start_date: form.start_date.as_deref().unwrap_or_default(),
                end_date: form.end_date.as_deref().unwrap_or_default(),
                logic: form.logic.as_deref().unwrap_or_default(),
            };
            return Html(index_page(Some(&e.to_string()), &values));
        }
    };

    let report = {
        let _gate = state.search_gate.lock().await;
        state.pipeline.run(&request).await
    };
    info!(count = report.count(), "Rendering results");

    Html(results_page(&report))
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "xlsx" => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
        Some(ext) if ext == "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// GET /download/{filename} - sends a generated artifact as an attachment.
pub async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    let Some(path) = state.pipeline.store().resolve(&filename) else {
        warn!(filename = %filename, "Rejected download name");
        return (StatusCode::BAD_REQUEST, "invalid file name").into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "file not found").into_response()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read download");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read file").into_response()
        }
    }
}
