//! Figure model for plotly.js
//!
//! Serializes to the `{ data, layout }` JSON object that `Plotly.newPlot`
//! takes, so the exported page needs no server-side rendering.

use serde::Serialize;

/// What a trace represents in the diagram (not serialized)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRole {
    /// Horizontal pipeline line
    Track,
    /// Feature on the source-run track
    SourceMarker,
    /// Feature on the destination-run track
    DestinationMarker,
    /// Dashed line joining a matched pair
    Connector,
    /// Phantom entry that only populates the legend
    LegendEntry,
}

/// plotly scatter draw mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lines,
    Markers,
}

/// Line styling for tracks, connectors and marker outlines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Line {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some("dash".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

/// A single scatter trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    /// `None` serializes as `null`, which plotly skips when drawing
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip)]
    pub role: TraceRole,
}

impl Trace {
    /// A trace with the given points and nothing else set
    pub fn scatter(role: TraceRole, mode: Mode, x: Vec<Option<f64>>, y: Vec<Option<f64>>) -> Self {
        Self {
            trace_type: "scatter",
            x,
            y,
            mode,
            name: None,
            marker: None,
            line: None,
            showlegend: false,
            hoverinfo: None,
            hovertemplate: None,
            role,
        }
    }

    /// Disable hover for this trace
    pub fn without_hover(mut self) -> Self {
        self.hoverinfo = Some("skip".to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Free text placed in data coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub showarrow: bool,
    pub xanchor: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            x: None,
            xanchor: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: String,
    pub yanchor: String,
    pub y: f64,
    pub xanchor: String,
    pub x: f64,
    pub bgcolor: String,
    pub bordercolor: String,
    pub borderwidth: u32,
}

/// Figure-level layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub height: u32,
    pub width: u32,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    pub hovermode: String,
    pub showlegend: bool,
    pub legend: Legend,
    pub annotations: Vec<Annotation>,
}

/// Counts of trace roles in a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TraceCounts {
    pub tracks: usize,
    pub markers: usize,
    pub connectors: usize,
    pub legend_entries: usize,
}

/// A complete diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

impl Figure {
    pub fn new(layout: FigureLayout) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.data.push(trace);
    }

    pub fn add_traces(&mut self, traces: impl IntoIterator<Item = Trace>) {
        self.data.extend(traces);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.layout.annotations.push(annotation);
    }

    pub fn counts(&self) -> TraceCounts {
        let mut counts = TraceCounts::default();
        for trace in &self.data {
            match trace.role {
                TraceRole::Track => counts.tracks += 1,
                TraceRole::SourceMarker | TraceRole::DestinationMarker => counts.markers += 1,
                TraceRole::Connector => counts.connectors += 1,
                TraceRole::LegendEntry => counts.legend_entries += 1,
            }
        }
        counts
    }

    /// Serialize to the JSON object passed to `Plotly.newPlot`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
