//! Legend entries and figure chrome
//!
//! Per-feature traces are hidden from the legend (there would be one entry
//! per row), so the legend is built from phantom traces with no points.

use crate::figure::{
    Annotation, Axis, FigureLayout, Font, Legend, Line, Marker, Mode, Title, Trace, TraceRole,
};
use crate::layout::TrackLayout;
use crate::pair::RunPair;
use crate::record::{Category, FeatureType};

pub const LEGEND_MARKER_SIZE: u32 = 10;
pub const LEGEND_TYPE_COLOR: &str = "gray";
pub const LABEL_COLOR: &str = "#2c3e50";

/// Categories shown in the legend. Disappeared rows only ever appear gray and
/// are left out.
pub const LEGEND_CATEGORIES: [(&str, Category); 3] = [
    ("Matched", Category::Matched),
    ("Uncertain", Category::Uncertain),
    ("New", Category::New),
];

/// Feature types shown in the legend
pub const LEGEND_TYPES: [FeatureType; 4] = [
    FeatureType::Anomaly,
    FeatureType::Bend,
    FeatureType::Valve,
    FeatureType::GirthWeld,
];

/// Figure size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 500,
        }
    }
}

fn phantom(name: &str, marker: Marker) -> Trace {
    let mut trace = Trace::scatter(TraceRole::LegendEntry, Mode::Markers, vec![None], vec![None]);
    trace.name = Some(name.to_string());
    trace.marker = Some(marker);
    trace.showlegend = true;
    trace
}

/// Phantom traces for category colors followed by feature-type symbols
pub fn build_legend_entries() -> Vec<Trace> {
    let categories = LEGEND_CATEGORIES.into_iter().map(|(label, category)| {
        phantom(
            label,
            Marker {
                size: LEGEND_MARKER_SIZE,
                color: category.color().to_string(),
                symbol: None,
                line: Some(Line::solid("white", 1.0)),
            },
        )
    });

    let types = LEGEND_TYPES.into_iter().map(|feature_type| {
        phantom(
            feature_type.as_str(),
            Marker {
                size: LEGEND_MARKER_SIZE,
                color: LEGEND_TYPE_COLOR.to_string(),
                symbol: Some(feature_type.symbol().to_string()),
                line: None,
            },
        )
    });

    categories.chain(types).collect()
}

fn run_label(layout: &TrackLayout, y: f64, year: &str) -> Annotation {
    Annotation {
        x: layout.label_x(),
        y,
        text: format!("<b>ILI Run<br>{}</b>", year),
        showarrow: false,
        xanchor: "right".to_string(),
        font: Font {
            size: Some(12),
            color: Some(LABEL_COLOR.to_string()),
        },
    }
}

/// Labels naming the run on each track, right-anchored left of the x-range
pub fn build_run_labels(layout: &TrackLayout, pair: RunPair) -> Vec<Annotation> {
    vec![
        run_label(layout, layout.source_y, pair.src_year()),
        run_label(layout, layout.destination_y, pair.dst_year()),
    ]
}

/// Title, axes, legend placement and background for a diagram
pub fn build_figure_layout(layout: &TrackLayout, pair: RunPair, size: FigureSize) -> FigureLayout {
    FigureLayout {
        title: Title {
            text: format!(
                "<b>ILI Data Alignment: {}</b><br><sub>Same pipeline features appear at different locations in each ILI run</sub>",
                pair
            ),
            x: Some(0.5),
            xanchor: Some("center".to_string()),
            font: Some(Font {
                size: Some(18),
                color: None,
            }),
        },
        xaxis: Axis {
            title: Some(Title::plain("Distance along pipeline (m)")),
            showgrid: Some(true),
            gridcolor: Some("lightgray".to_string()),
            ..Axis::default()
        },
        yaxis: Axis {
            showticklabels: Some(false),
            showgrid: Some(false),
            zeroline: Some(false),
            range: Some(layout.y_range()),
            ..Axis::default()
        },
        height: size.height,
        width: size.width,
        plot_bgcolor: "white".to_string(),
        paper_bgcolor: "white".to_string(),
        hovermode: "closest".to_string(),
        showlegend: true,
        legend: Legend {
            orientation: "h".to_string(),
            yanchor: "bottom".to_string(),
            y: -0.2,
            xanchor: "center".to_string(),
            x: 0.5,
            bgcolor: "rgba(255,255,255,0.9)".to_string(),
            bordercolor: "gray".to_string(),
            borderwidth: 1,
        },
        annotations: build_run_labels(layout, pair),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DEFAULT_PADDING_M, LABEL_OFFSET_M};
    use crate::record::MatchedFeature;

    fn layout() -> TrackLayout {
        let sample = vec![MatchedFeature::new(3000.0, 3100.0, Category::Matched)];
        TrackLayout::compute(&sample, DEFAULT_PADDING_M).unwrap()
    }

    #[test]
    fn test_legend_entries() {
        let entries = build_legend_entries();
        let names: Vec<_> = entries.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(
            names,
            ["Matched", "Uncertain", "New", "Anomaly", "Bend", "Valve", "Girth Weld"]
        );

        for entry in &entries {
            assert!(entry.showlegend);
            assert_eq!(entry.x, vec![None]);
            assert_eq!(entry.role, TraceRole::LegendEntry);
        }

        let valve = entries[5].marker.as_ref().unwrap();
        assert_eq!(valve.color, LEGEND_TYPE_COLOR);
        assert_eq!(valve.symbol.as_deref(), Some("star"));
    }

    #[test]
    fn test_run_labels_left_of_range() {
        let layout = layout();
        let labels = build_run_labels(&layout, RunPair::Run2015To2022);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "<b>ILI Run<br>2015</b>");
        assert_eq!(labels[1].text, "<b>ILI Run<br>2022</b>");
        for label in &labels {
            assert_eq!(label.x, layout.min_dist - LABEL_OFFSET_M);
            assert_eq!(label.xanchor, "right");
            assert!(!label.showarrow);
        }
    }

    #[test]
    fn test_figure_layout() {
        let figure_layout =
            build_figure_layout(&layout(), RunPair::Run2007To2015, FigureSize::default());

        assert!(figure_layout.title.text.contains("ILI Data Alignment: 2007 → 2015"));
        assert_eq!(figure_layout.width, 1400);
        assert_eq!(figure_layout.height, 500);
        assert_eq!(figure_layout.yaxis.range, Some([0.0, 2.5]));
        assert_eq!(figure_layout.yaxis.showticklabels, Some(false));
        assert_eq!(figure_layout.annotations.len(), 2);
    }
}
