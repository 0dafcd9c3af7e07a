//! Matched feature records
//!
//! One row of a matched-feature table: a feature detected in the source run,
//! its counterpart in the destination run (already moved into the source
//! run's distance frame), and how the pair was classified.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback color for categories outside the known set
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

/// Classification of a matched pair across two runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Same feature found in both runs
    #[default]
    Matched,
    /// Candidate pair with low confidence
    Uncertain,
    /// Only present in the destination run
    New,
    /// Only present in the source run
    Disappeared,
    /// Any label the matcher emitted that we do not recognize
    Other(String),
}

impl Category {
    /// Parse a category label. Unknown labels are kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "matched" => Category::Matched,
            "uncertain" => Category::Uncertain,
            "new" => Category::New,
            "disappeared" => Category::Disappeared,
            other => Category::Other(other.to_string()),
        }
    }

    /// The label as written in the source table
    pub fn as_str(&self) -> &str {
        match self {
            Category::Matched => "matched",
            Category::Uncertain => "uncertain",
            Category::New => "new",
            Category::Disappeared => "disappeared",
            Category::Other(label) => label,
        }
    }

    /// Marker color for this category
    pub fn color(&self) -> &'static str {
        match self {
            Category::Matched => "#27ae60",     // green
            Category::Uncertain => "#f39c12",   // orange
            Category::New => "#e74c3c",         // red
            Category::Disappeared => "#95a5a6", // gray
            Category::Other(_) => DEFAULT_CATEGORY_COLOR,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Category::Matched)
    }

    /// Category for a row whose category cell is empty
    pub fn unlabelled() -> Self {
        Category::Other(String::new())
    }

    pub fn is_unlabelled(&self) -> bool {
        matches!(self, Category::Other(label) if label.is_empty())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized pipeline feature type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeatureType {
    Anomaly,
    Bend,
    Valve,
    Tee,
    GirthWeld,
    /// The normalizer could not classify the feature
    #[default]
    Unknown,
    /// A type label outside the normalized vocabulary
    Other(String),
}

impl FeatureType {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Anomaly" => FeatureType::Anomaly,
            "Bend" => FeatureType::Bend,
            "Valve" => FeatureType::Valve,
            "Tee" => FeatureType::Tee,
            "Girth Weld" => FeatureType::GirthWeld,
            "unknown" | "" => FeatureType::Unknown,
            other => FeatureType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FeatureType::Anomaly => "Anomaly",
            FeatureType::Bend => "Bend",
            FeatureType::Valve => "Valve",
            FeatureType::Tee => "Tee",
            FeatureType::GirthWeld => "Girth Weld",
            FeatureType::Unknown => "unknown",
            FeatureType::Other(label) => label,
        }
    }

    /// Marker symbol name understood by plotly.js
    pub fn symbol(&self) -> &'static str {
        match self {
            FeatureType::Anomaly => "circle",
            FeatureType::Bend => "diamond",
            FeatureType::Valve => "star",
            FeatureType::Tee => "hexagon",
            FeatureType::GirthWeld => "square",
            FeatureType::Unknown | FeatureType::Other(_) => "x",
        }
    }
}

impl From<String> for FeatureType {
    fn from(label: String) -> Self {
        FeatureType::from_label(&label)
    }
}

impl From<FeatureType> for String {
    fn from(feature_type: FeatureType) -> Self {
        feature_type.as_str().to_string()
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature pair from a matched-feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedFeature {
    /// Distance along the source run (m)
    pub src_distance_m: f64,
    /// Distance along the destination run after alignment (m)
    pub dst_distance_m_aligned: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub type_norm: FeatureType,
    #[serde(default)]
    pub src_id: Option<String>,
    #[serde(default)]
    pub dst_id: Option<String>,
    /// Match confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
}

impl MatchedFeature {
    pub fn new(src_distance_m: f64, dst_distance_m_aligned: f64, category: Category) -> Self {
        Self {
            src_distance_m,
            dst_distance_m_aligned,
            category,
            type_norm: FeatureType::Unknown,
            src_id: None,
            dst_id: None,
            confidence: 0.0,
        }
    }

    pub fn with_type(mut self, type_norm: FeatureType) -> Self {
        self.type_norm = type_norm;
        self
    }

    pub fn with_ids(mut self, src_id: Option<&str>, dst_id: Option<&str>) -> Self {
        self.src_id = src_id.map(str::to_string);
        self.dst_id = dst_id.map(str::to_string);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Source id for display, `N/A` when absent
    pub fn src_id_label(&self) -> &str {
        self.src_id.as_deref().unwrap_or("N/A")
    }

    /// Destination id for display, `N/A` when absent
    pub fn dst_id_label(&self) -> &str {
        self.dst_id.as_deref().unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_colors() {
        assert_eq!(Category::Matched.color(), "#27ae60");
        assert_eq!(Category::Uncertain.color(), "#f39c12");
        assert_eq!(Category::New.color(), "#e74c3c");
        assert_eq!(Category::Disappeared.color(), "#95a5a6");
        assert_eq!(
            Category::from_label("relocated").color(),
            DEFAULT_CATEGORY_COLOR
        );
    }

    #[test]
    fn test_category_label_roundtrip_keeps_unknown() {
        let category = Category::from_label("relocated");
        assert_eq!(category, Category::Other("relocated".to_string()));
        assert_eq!(category.to_string(), "relocated");
        assert!(!category.is_matched());
        assert!(Category::from_label(" matched ").is_matched());
    }

    #[test]
    fn test_feature_type_symbols() {
        assert_eq!(FeatureType::from_label("Anomaly").symbol(), "circle");
        assert_eq!(FeatureType::from_label("Bend").symbol(), "diamond");
        assert_eq!(FeatureType::from_label("Valve").symbol(), "star");
        assert_eq!(FeatureType::from_label("Tee").symbol(), "hexagon");
        assert_eq!(FeatureType::from_label("Girth Weld").symbol(), "square");
        assert_eq!(FeatureType::from_label("unknown").symbol(), "x");
        assert_eq!(FeatureType::from_label("Flange").symbol(), "x");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{"src_distance_m": 10.0, "dst_distance_m_aligned": 12.5}"#;
        let feature: MatchedFeature = serde_json::from_str(json).unwrap();

        assert_eq!(feature.category, Category::Matched);
        assert_eq!(feature.type_norm, FeatureType::Unknown);
        assert_eq!(feature.confidence, 0.0);
        assert_eq!(feature.src_id_label(), "N/A");
        assert_eq!(feature.dst_id_label(), "N/A");
    }
}
