//! # ili-align-viz - ILI Alignment Diagrams
//!
//! Renders interactive diagrams comparing two in-line-inspection (ILI)
//! pipeline survey runs: how features detected in one run (anomalies, girth
//! welds, valves, bends, tees) line up with the same features in a later run.
//!
//! ## Overview
//!
//! Input is a matched-feature table produced by an upstream alignment stage.
//! For each run pair the crate:
//!
//! 1. **Samples** a small, category-stratified, seeded subset of rows
//! 2. **Lays out** two horizontal tracks over a shared distance axis
//! 3. **Plots** every sampled feature on both tracks, joining matched pairs
//!    with a dashed connector
//! 4. **Exports** a standalone HTML page that loads plotly.js from its CDN
//!
//! ## Usage
//!
//! ```bash
//! ili-align-viz \
//!     --matches-2007-2015 matches_2007_2015.csv \
//!     --matches-2015-2022 matches_2015_2022.csv \
//!     -o reports/
//! ```

pub mod config;
pub mod export;
pub mod figure;
pub mod layout;
pub mod legend;
pub mod pair;
pub mod record;
pub mod render;
pub mod sampler;
pub mod table;
pub mod traces;
pub mod web;

pub use config::{
    AlignVizConfig, ConfigError, LayoutConfig, OutputConfig, TablesConfig, discover_config,
    discover_config_in, load_config, load_config_file,
};
pub use export::{ExportError, ExportOptions, PLOTLY_CDN_URL, present, render_html, write_html};
pub use figure::{Figure, Trace, TraceCounts, TraceRole};
pub use layout::{DESTINATION_TRACK_Y, LayoutError, SOURCE_TRACK_Y, TrackLayout};
pub use legend::{FigureSize, build_figure_layout, build_legend_entries, build_run_labels};
pub use pair::{PairJob, RunPair};
pub use record::{Category, FeatureType, MatchedFeature};
pub use render::{
    RenderError, RenderFailure, RenderOptions, RenderSummary, RenderedDiagram, build_figure,
    render_all, render_file, render_files, render_pair,
};
pub use sampler::{SamplingConfig, sample_features};
pub use table::{TableError, load_table};
pub use traces::{build_feature_traces, build_sample_traces, build_tracks};
