//! Web server for alignment diagrams
//!
//! Provides an HTTP server using Axum that presents the diagrams rendered in
//! this run, plus a small JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::export::ExportOptions;
use crate::render::RenderedDiagram;

use super::routes;

/// Shared application state
pub struct AppState {
    pub diagrams: Vec<RenderedDiagram>,
    pub export: ExportOptions,
}

impl AppState {
    /// Find a diagram by pair id (`2007_to_2015`)
    pub fn diagram(&self, pair_id: &str) -> Option<&RenderedDiagram> {
        self.diagrams.iter().find(|d| d.pair.id() == pair_id)
    }
}

/// Configuration for the web server
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            open_browser: true,
        }
    }
}

/// Build the router serving `state`
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::static_routes())
        .with_state(state)
}

/// Start the web server and serve the diagrams
pub async fn start_server(
    diagrams: Vec<RenderedDiagram>,
    export: ExportOptions,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState { diagrams, export });

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://localhost:{}", config.port);
    eprintln!("Starting web server at {}", url);

    if config.open_browser {
        eprintln!("Opening browser...");
        if let Err(e) = open::that(&url) {
            eprintln!("Warning: Could not open browser: {}", e);
            eprintln!("Please open {} manually", url);
        }
    }

    eprintln!("Press Ctrl+C to stop the server");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
