//! HTML export
//!
//! Writes a standalone page that loads plotly.js from its CDN and draws the
//! embedded figure. The page works in any browser with network access; no
//! other files are needed next to it.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::figure::Figure;

/// plotly.js bundle referenced by exported pages
pub const PLOTLY_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Errors that can occur when exporting a figure
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize figure: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// HTML document options
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub page_title: String,
    pub plotly_url: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_title: "ILI Data Alignment".to_string(),
            plotly_url: PLOTLY_CDN_URL.to_string(),
        }
    }
}

/// Render the figure as an HTML document
pub fn render_html(figure: &Figure, options: &ExportOptions) -> Result<String, ExportError> {
    // "</" inside a script element would end it early
    let figure_json = figure.to_json()?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly_url}" charset="utf-8"></script>
</head>
<body>
    <div id="ili-alignment" style="width:{width}px;height:{height}px;"></div>
    <script>
        var figure = {figure_json};
        Plotly.newPlot("ili-alignment", figure.data, figure.layout, {{responsive: true}});
    </script>
</body>
</html>
"#,
        title = html_escape(&options.page_title),
        plotly_url = options.plotly_url,
        width = figure.layout.width,
        height = figure.layout.height,
        figure_json = figure_json,
    ))
}

/// Write the figure to `path` as an HTML document
pub fn write_html(figure: &Figure, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let html = render_html(figure, options)?;
    fs::write(path, html).map_err(|source| ExportError::IoError {
        path: path.display().to_string(),
        source,
    })
}

/// Open an exported file in the default browser
pub fn present(path: &Path) -> std::io::Result<()> {
    open::that(path)
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
