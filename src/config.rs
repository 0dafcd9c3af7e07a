//! Configuration file support for ili-align-viz
//!
//! This module handles parsing `.ili-align.toml` configuration files that
//! set sampling, layout and output defaults, and optionally name the matched
//! tables for each run pair.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .ili-align.toml
//!
//! [sampling]
//! # Maximum features plotted per diagram
//! cap = 15
//! # Maximum features drawn from each category
//! per_category = 5
//! # Seed for the per-category draw
//! seed = 42
//!
//! [layout]
//! # Padding on both sides of the distance range (m)
//! padding_m = 1000.0
//! width = 1400
//! height = 500
//!
//! [output]
//! dir = "reports"
//! # Open each diagram in the browser after writing it
//! open = true
//!
//! [tables]
//! # Relative paths are resolved against the config file's directory
//! matches_2007_2015 = "data/matches_2007_2015.csv"
//! matches_2015_2022 = "data/matches_2015_2022.csv"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::PLOTLY_CDN_URL;
use crate::layout::DEFAULT_PADDING_M;
use crate::legend::FigureSize;
use crate::pair::RunPair;
use crate::render::RenderOptions;
use crate::sampler::SamplingConfig;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Layout configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Padding on both sides of the distance range (m)
    #[serde(default = "default_padding")]
    pub padding_m: f64,

    /// Figure width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Figure height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_padding() -> f64 {
    DEFAULT_PADDING_M
}

fn default_width() -> u32 {
    FigureSize::default().width
}

fn default_height() -> u32 {
    FigureSize::default().height
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_m: default_padding(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Output configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the HTML files are written to
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Open each diagram in the browser after writing it
    #[serde(default = "default_open")]
    pub open: bool,

    /// plotly.js bundle referenced by the exported pages
    #[serde(default = "default_plotly_url")]
    pub plotly_url: String,
}

fn default_open() -> bool {
    true
}

fn default_plotly_url() -> String {
    PLOTLY_CDN_URL.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            open: default_open(),
            plotly_url: default_plotly_url(),
        }
    }
}

/// Matched table locations
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TablesConfig {
    #[serde(default)]
    pub matches_2007_2015: Option<PathBuf>,

    #[serde(default)]
    pub matches_2015_2022: Option<PathBuf>,
}

impl TablesConfig {
    /// Table configured for a pair, if any
    pub fn table_for(&self, pair: RunPair) -> Option<&Path> {
        match pair {
            RunPair::Run2007To2015 => self.matches_2007_2015.as_deref(),
            RunPair::Run2015To2022 => self.matches_2015_2022.as_deref(),
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for path in [&mut self.matches_2007_2015, &mut self.matches_2015_2022]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlignVizConfig {
    /// Sampling configuration
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Matched table locations
    #[serde(default)]
    pub tables: TablesConfig,

    /// Where the file was loaded from, if anywhere
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AlignVizConfig {
    /// Render options described by this config
    pub fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions {
            sampling: self.sampling,
            padding: self.layout.padding_m,
            size: FigureSize {
                width: self.layout.width,
                height: self.layout.height,
            },
            present: self.output.open,
            ..RenderOptions::default()
        };
        options.export.plotly_url = self.output.plotly_url.clone();
        options
    }
}

/// Load configuration from a file or directory
///
/// A directory is searched for `.ili-align.toml` in it and its parent
/// directories, and no file there yields defaults. Any other path must be a
/// readable config file.
pub fn load_config(path: &Path) -> Result<AlignVizConfig, ConfigError> {
    if path.is_dir() {
        discover_config(path)
    } else {
        load_config_file(path)
    }
}

/// Read and parse one config file
pub fn load_config_file(path: &Path) -> Result<AlignVizConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AlignVizConfig = toml::from_str(&content)?;
    if let Some(base) = path.parent() {
        config.tables.resolve_against(base);
    }
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Search `start` and its ancestors for a config file; defaults if none
///
/// `start` need not exist yet (an output directory about to be created).
pub fn discover_config(start: &Path) -> Result<AlignVizConfig, ConfigError> {
    let cwd = std::env::current_dir()?;
    discover_config_in(start, &cwd)
}

/// Like [`discover_config`], resolving a relative `start` against `cwd`
pub fn discover_config_in(start: &Path, cwd: &Path) -> Result<AlignVizConfig, ConfigError> {
    let absolute = cwd.join(start);
    let start = fs::canonicalize(&absolute).unwrap_or(absolute);

    match find_config_file(&start) {
        Some(config_path) => load_config_file(&config_path),
        None => Ok(AlignVizConfig::default()),
    }
}

/// Find the config file by searching up the directory tree
fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".ili-align.toml", "ili-align.toml"];

    let mut current = start_path.to_path_buf();

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        // Move to parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}
