//! Track layout
//!
//! Both runs are drawn as horizontal tracks sharing one x-axis. The source
//! run sits on top, the destination run 1.5 units below it.

use serde::Serialize;
use thiserror::Error;

use crate::record::MatchedFeature;

/// y of the source-run track
pub const SOURCE_TRACK_Y: f64 = 2.0;
/// y of the destination-run track
pub const DESTINATION_TRACK_Y: f64 = SOURCE_TRACK_Y - 1.5;
/// Default x padding on both sides of the data (m)
pub const DEFAULT_PADDING_M: f64 = 1000.0;
/// Gap between the x-range start and the run labels (m)
pub const LABEL_OFFSET_M: f64 = 500.0;
/// Vertical margin above and below the tracks
const Y_MARGIN: f64 = 0.5;

/// Errors that can occur when laying out a diagram
#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("No data: the sample is empty")]
    EmptySample,

    #[error("Row {row} has a non-finite distance")]
    NonFiniteDistance { row: usize },
}

/// Shared x-range and fixed track positions for one diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackLayout {
    pub min_dist: f64,
    pub max_dist: f64,
    pub source_y: f64,
    pub destination_y: f64,
}

impl TrackLayout {
    /// Compute the layout for a non-empty sample
    pub fn compute(sample: &[MatchedFeature], padding: f64) -> Result<Self, LayoutError> {
        if sample.is_empty() {
            return Err(LayoutError::EmptySample);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (i, row) in sample.iter().enumerate() {
            for d in [row.src_distance_m, row.dst_distance_m_aligned] {
                if !d.is_finite() {
                    return Err(LayoutError::NonFiniteDistance { row: i + 1 });
                }
                min = min.min(d);
                max = max.max(d);
            }
        }

        Ok(Self {
            min_dist: min - padding,
            max_dist: max + padding,
            source_y: SOURCE_TRACK_Y,
            destination_y: DESTINATION_TRACK_Y,
        })
    }

    /// x position of the run labels, left of the tracks
    pub fn label_x(&self) -> f64 {
        self.min_dist - LABEL_OFFSET_M
    }

    /// Visible y-range with a margin around both tracks
    pub fn y_range(&self) -> [f64; 2] {
        [self.destination_y - Y_MARGIN, self.source_y + Y_MARGIN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    #[test]
    fn test_empty_sample_fails() {
        assert_eq!(
            TrackLayout::compute(&[], DEFAULT_PADDING_M),
            Err(LayoutError::EmptySample)
        );
    }

    #[test]
    fn test_range_is_padded_over_both_tracks() {
        let sample = vec![
            MatchedFeature::new(5000.0, 4900.0, Category::Matched),
            MatchedFeature::new(12000.0, 12150.0, Category::New),
        ];
        let layout = TrackLayout::compute(&sample, DEFAULT_PADDING_M).unwrap();

        assert_eq!(layout.min_dist, 3900.0);
        assert_eq!(layout.max_dist, 13150.0);
        for row in &sample {
            for d in [row.src_distance_m, row.dst_distance_m_aligned] {
                assert!(layout.min_dist <= d - DEFAULT_PADDING_M);
                assert!(layout.max_dist >= d + DEFAULT_PADDING_M);
            }
        }
    }

    #[test]
    fn test_track_positions_are_fixed() {
        let sample = vec![MatchedFeature::new(1.0, 1.0, Category::Matched)];
        let layout = TrackLayout::compute(&sample, 0.0).unwrap();

        assert_eq!(layout.source_y, 2.0);
        assert_eq!(layout.destination_y, 0.5);
        assert_eq!(layout.y_range(), [0.0, 2.5]);
        assert_eq!(layout.label_x(), 1.0 - LABEL_OFFSET_M);
    }

    #[test]
    fn test_non_finite_distance_fails() {
        let sample = vec![
            MatchedFeature::new(1.0, 1.0, Category::Matched),
            MatchedFeature::new(f64::NAN, 1.0, Category::Matched),
        ];
        assert_eq!(
            TrackLayout::compute(&sample, DEFAULT_PADDING_M),
            Err(LayoutError::NonFiniteDistance { row: 2 })
        );
    }
}
