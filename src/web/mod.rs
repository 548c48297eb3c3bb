//! HTTP surface: search form, results page and artifact downloads.

pub mod routes;
pub mod views;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Held for the duration of a search so requests run one after another.
    pub search_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            search_gate: Arc::new(Mutex::new(())),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.pipeline.store().root());

    Router::new()
        .route("/", get(routes::index))
        .route("/scrape", post(routes::scrape))
        .route("/download/{filename}", get(routes::download))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
