//! HTTP routes for the web presentation
//!
//! Provides API endpoints for diagram data and static file serving.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use rust_embed::RustEmbed;

use serde::Serialize;

use super::server::AppState;
use crate::export;
use crate::figure::TraceCounts;
use crate::render::RenderedDiagram;

/// Embedded static assets
#[derive(RustEmbed)]
#[folder = "web-assets/"]
struct Assets;

/// One entry of the diagram index
#[derive(Debug, Serialize)]
pub struct DiagramSummary {
    pub id: &'static str,
    pub title: String,
    pub file_path: String,
    pub table_rows: usize,
    pub sample_rows: usize,
    pub counts: TraceCounts,
}

impl From<&RenderedDiagram> for DiagramSummary {
    fn from(diagram: &RenderedDiagram) -> Self {
        Self {
            id: diagram.pair.id(),
            title: format!("ILI Data Alignment: {}", diagram.pair),
            file_path: diagram.path.display().to_string(),
            table_rows: diagram.table_rows,
            sample_rows: diagram.sample_rows,
            counts: diagram.counts,
        }
    }
}

/// Create API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/diagrams", get(get_diagrams))
        .route("/api/figure/{pair}", get(get_figure))
        .route("/api/health", get(health_check))
}

/// Create page and static file routes
pub fn static_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_html))
        .route("/diagram/{pair}", get(diagram_page))
        .route("/{*path}", get(static_handler))
}

fn not_found(pair: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("Diagram '{}' not found", pair)})),
    )
        .into_response()
}

/// GET /api/diagrams - Lists the diagrams rendered in this run
async fn get_diagrams(State(state): State<Arc<AppState>>) -> Json<Vec<DiagramSummary>> {
    Json(state.diagrams.iter().map(DiagramSummary::from).collect())
}

/// GET /api/figure/{pair} - Returns the plotly figure for a pair
async fn get_figure(
    State(state): State<Arc<AppState>>,
    Path(pair): Path<String>,
) -> impl IntoResponse {
    match state.diagram(&pair) {
        Some(diagram) => Json(diagram.figure.clone()).into_response(),
        None => not_found(&pair),
    }
}

/// GET /api/health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// GET /diagram/{pair} - Serves the standalone diagram page
async fn diagram_page(
    State(state): State<Arc<AppState>>,
    Path(pair): Path<String>,
) -> impl IntoResponse {
    let Some(diagram) = state.diagram(&pair) else {
        return not_found(&pair);
    };

    let options = export::ExportOptions {
        page_title: format!("ILI Data Alignment: {}", diagram.pair),
        ..state.export.clone()
    };
    match export::render_html(&diagram.figure, &options) {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// GET / - Serve index.html
async fn index_html() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(content) => Html(content.data.into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

/// Static file handler for embedded assets
async fn static_handler(Path(path): Path<String>) -> impl IntoResponse {
    let path = path.trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                mime_guess::from_path(path).first_or_octet_stream().to_string(),
            )],
            content.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::{PairJob, RunPair};
    use crate::record::{Category, MatchedFeature};
    use crate::render::{RenderOptions, render_pair};

    #[test]
    fn test_summary_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let table = vec![
            MatchedFeature::new(100.0, 104.0, Category::Matched),
            MatchedFeature::new(900.0, 880.0, Category::Disappeared),
        ];
        let job = PairJob::new(RunPair::Run2015To2022, table, dir.path());
        let diagram = render_pair(&job, &RenderOptions::default()).unwrap();

        let summary = DiagramSummary::from(&diagram);
        assert_eq!(summary.id, "2015_to_2022");
        assert_eq!(summary.sample_rows, 2);
        assert_eq!(summary.counts.connectors, 1);

        let state = AppState {
            diagrams: vec![diagram],
            export: export::ExportOptions::default(),
        };
        assert!(state.diagram("2015_to_2022").is_some());
        assert!(state.diagram("2007_to_2015").is_none());
    }

    #[test]
    fn test_index_is_embedded() {
        let index = Assets::get("index.html").unwrap();
        let text = String::from_utf8(index.data.into_owned()).unwrap();
        assert!(text.contains("/api/diagrams"));
    }
}
