//! Data traces: pipeline tracks, feature markers and match connectors

use crate::figure::{Line, Marker, Mode, Trace, TraceRole};
use crate::layout::TrackLayout;
use crate::pair::RunPair;
use crate::record::MatchedFeature;

pub const MARKER_SIZE: u32 = 12;
pub const TRACK_WIDTH: f64 = 8.0;
pub const CONNECTOR_COLOR: &str = "#e74c3c";
/// Connectors stop short of the tracks by this much
pub const CONNECTOR_INSET: f64 = 0.15;

/// The two pipeline lines spanning the x-range
pub fn build_tracks(layout: &TrackLayout) -> Vec<Trace> {
    [layout.source_y, layout.destination_y]
        .into_iter()
        .map(|y| {
            let mut trace = Trace::scatter(
                TraceRole::Track,
                Mode::Lines,
                vec![Some(layout.min_dist), Some(layout.max_dist)],
                vec![Some(y), Some(y)],
            )
            .without_hover();
            trace.line = Some(Line::solid("black", TRACK_WIDTH));
            trace
        })
        .collect()
}

fn feature_marker(feature: &MatchedFeature) -> Marker {
    Marker {
        size: MARKER_SIZE,
        color: feature.category.color().to_string(),
        symbol: Some(feature.type_norm.symbol().to_string()),
        line: Some(Line::solid("white", 1.0)),
    }
}

/// Make table text literal inside a hovertemplate
///
/// plotly.js treats `%{...}` as a field reference and the rest as HTML.
pub fn hover_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '%' => escaped.push_str("&#37;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Tooltip for the source-run marker
pub fn source_hover(feature: &MatchedFeature, pair: RunPair) -> String {
    format!(
        "<b>{} Run</b><br>Type: {}<br>Distance: {:.0}m<br>ID: {}<br>Category: {}<br><extra></extra>",
        pair.src_year(),
        hover_escape(feature.type_norm.as_str()),
        feature.src_distance_m,
        hover_escape(feature.src_id_label()),
        hover_escape(feature.category.as_str()),
    )
}

/// Tooltip for the destination-run marker
pub fn destination_hover(feature: &MatchedFeature, pair: RunPair) -> String {
    format!(
        "<b>{} Run</b><br>Type: {}<br>Aligned Distance: {:.0}m<br>ID: {}<br>Category: {}<br>Confidence: {:.2}<br><extra></extra>",
        pair.dst_year(),
        hover_escape(feature.type_norm.as_str()),
        feature.dst_distance_m_aligned,
        hover_escape(feature.dst_id_label()),
        hover_escape(feature.category.as_str()),
        feature.confidence,
    )
}

/// Traces for one feature pair: two markers, plus a connector if matched
pub fn build_feature_traces(
    feature: &MatchedFeature,
    layout: &TrackLayout,
    pair: RunPair,
) -> Vec<Trace> {
    let mut traces = Vec::with_capacity(3);

    let mut source = Trace::scatter(
        TraceRole::SourceMarker,
        Mode::Markers,
        vec![Some(feature.src_distance_m)],
        vec![Some(layout.source_y)],
    );
    source.name = Some(feature.type_norm.to_string());
    source.marker = Some(feature_marker(feature));
    source.hovertemplate = Some(source_hover(feature, pair));
    traces.push(source);

    let mut destination = Trace::scatter(
        TraceRole::DestinationMarker,
        Mode::Markers,
        vec![Some(feature.dst_distance_m_aligned)],
        vec![Some(layout.destination_y)],
    );
    destination.marker = Some(feature_marker(feature));
    destination.hovertemplate = Some(destination_hover(feature, pair));
    traces.push(destination);

    if feature.category.is_matched() {
        let mut connector = Trace::scatter(
            TraceRole::Connector,
            Mode::Lines,
            vec![
                Some(feature.src_distance_m),
                Some(feature.dst_distance_m_aligned),
            ],
            vec![
                Some(layout.source_y - CONNECTOR_INSET),
                Some(layout.destination_y + CONNECTOR_INSET),
            ],
        )
        .without_hover();
        connector.line = Some(Line::dashed(CONNECTOR_COLOR, 1.0));
        traces.push(connector);
    }

    traces
}

/// Traces for every row of a sample, in sample order
pub fn build_sample_traces(
    sample: &[MatchedFeature],
    layout: &TrackLayout,
    pair: RunPair,
) -> Vec<Trace> {
    sample
        .iter()
        .flat_map(|feature| build_feature_traces(feature, layout, pair))
        .collect()
}
