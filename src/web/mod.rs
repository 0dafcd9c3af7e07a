//! Web presentation of rendered diagrams
//!
//! Serves an index of the diagrams generated in this run, each diagram's
//! HTML page, and the figure JSON behind it.

pub mod routes;
pub mod server;

pub use server::{AppState, ServerConfig, app, start_server};
