//! Diagram generation
//!
//! Runs sample -> layout -> traces -> legend -> export for each run pair.
//! Each pair is rendered in its own guarded scope: a failure is reported with
//! its cause chain and the remaining pairs are still rendered.

use std::error::Error as StdError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::export::{self, ExportError, ExportOptions};
use crate::figure::{Figure, TraceCounts};
use crate::layout::{DEFAULT_PADDING_M, LayoutError, TrackLayout};
use crate::legend::{FigureSize, build_figure_layout, build_legend_entries};
use crate::pair::{PairJob, RunPair};
use crate::record::MatchedFeature;
use crate::sampler::{SamplingConfig, sample_features};
use crate::table::{TableError, load_table};
use crate::traces::{build_sample_traces, build_tracks};

/// Errors that can occur while generating one diagram
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to load matched table")]
    Table(#[from] TableError),

    #[error("Failed to lay out diagram")]
    Layout(#[from] LayoutError),

    #[error("Failed to export diagram")]
    Export(#[from] ExportError),
}

/// Options shared by every diagram in a run
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub sampling: SamplingConfig,
    /// x padding on both sides of the data (m)
    pub padding: f64,
    pub size: FigureSize,
    pub export: ExportOptions,
    /// Open each exported file in the browser
    pub present: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            padding: DEFAULT_PADDING_M,
            size: FigureSize::default(),
            export: ExportOptions::default(),
            present: false,
        }
    }
}

/// A diagram that was written successfully
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDiagram {
    pub pair: RunPair,
    pub path: PathBuf,
    pub table_rows: usize,
    pub sample_rows: usize,
    pub counts: TraceCounts,
    #[serde(skip)]
    pub figure: Figure,
}

/// A diagram that could not be generated
#[derive(Debug, Clone, Serialize)]
pub struct RenderFailure {
    pub pair: RunPair,
    pub message: String,
    /// Messages of the underlying causes, outermost first
    pub causes: Vec<String>,
}

/// Outcome of rendering a queue of diagrams
#[derive(Debug, Default, Serialize)]
pub struct RenderSummary {
    pub rendered: Vec<RenderedDiagram>,
    pub failures: Vec<RenderFailure>,
}

impl RenderSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Build the complete figure for a table without writing it anywhere
///
/// Returns the figure and the number of sampled rows.
pub fn build_figure(
    table: &[MatchedFeature],
    pair: RunPair,
    options: &RenderOptions,
) -> Result<(Figure, usize), LayoutError> {
    let sample = sample_features(table, &options.sampling);
    let layout = TrackLayout::compute(&sample, options.padding)?;

    let mut figure = Figure::new(build_figure_layout(&layout, pair, options.size));
    figure.add_traces(build_tracks(&layout));
    figure.add_traces(build_sample_traces(&sample, &layout, pair));
    figure.add_traces(build_legend_entries());

    Ok((figure, sample.len()))
}

/// Generate and export the diagram for one job
pub fn render_pair(job: &PairJob, options: &RenderOptions) -> Result<RenderedDiagram, RenderError> {
    let (figure, sample_rows) = build_figure(&job.table, job.pair, options)?;

    let path = job.output_path();
    let export_options = ExportOptions {
        page_title: format!("ILI Data Alignment: {}", job.pair),
        ..options.export.clone()
    };
    export::write_html(&figure, &path, &export_options)?;

    if options.present {
        if let Err(e) = export::present(&path) {
            eprintln!("Warning: Could not open {}: {}", path.display(), e);
        }
    }

    Ok(RenderedDiagram {
        pair: job.pair,
        path,
        table_rows: job.table.len(),
        sample_rows,
        counts: figure.counts(),
        figure,
    })
}

/// Load the table at `table_path` and render it
pub fn render_file(
    pair: RunPair,
    table_path: &Path,
    output_dir: &Path,
    options: &RenderOptions,
) -> Result<RenderedDiagram, RenderError> {
    let table = load_table(table_path)?;
    render_pair(&PairJob::new(pair, table, output_dir), options)
}

/// Messages of an error's sources, outermost first
pub fn error_causes(error: &dyn StdError) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes
}

/// Report one outcome to `writer` and record it in `summary`
pub fn record_outcome<W: Write>(
    pair: RunPair,
    outcome: Result<RenderedDiagram, RenderError>,
    summary: &mut RenderSummary,
    writer: &mut W,
) -> io::Result<()> {
    match outcome {
        Ok(diagram) => {
            writeln!(writer, "Saved: {}", diagram.path.display())?;
            summary.rendered.push(diagram);
        }
        Err(e) => {
            let failure = RenderFailure {
                pair,
                message: e.to_string(),
                causes: error_causes(&e),
            };
            writeln!(
                writer,
                "Error generating alignment diagram {}: {}",
                pair.id(),
                failure.message
            )?;
            for cause in &failure.causes {
                writeln!(writer, "  caused by: {}", cause)?;
            }
            summary.failures.push(failure);
        }
    }
    Ok(())
}

/// Render every job in order, continuing past failures
pub fn render_all<W: Write>(
    jobs: &[PairJob],
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<RenderSummary> {
    let mut summary = RenderSummary::default();
    for job in jobs {
        record_outcome(job.pair, render_pair(job, options), &mut summary, writer)?;
    }
    Ok(summary)
}

/// Load and render each `(pair, table file)` in order, continuing past failures
pub fn render_files<W: Write>(
    sources: &[(RunPair, PathBuf)],
    output_dir: &Path,
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<RenderSummary> {
    let mut summary = RenderSummary::default();
    for (pair, table_path) in sources {
        let outcome = render_file(*pair, table_path, output_dir, options);
        record_outcome(*pair, outcome, &mut summary, writer)?;
    }
    Ok(summary)
}
