//! Matched-feature table loading
//!
//! Tables come from the upstream alignment stage as CSV (one header row,
//! columns addressed by name) or JSON (an array of row objects). Empty CSV
//! cells and JSON nulls count as absent values. A table without a category
//! column is all matched; an absent category cell in a table that has the
//! column leaves the row unlabelled.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::record::{Category, FeatureType, MatchedFeature};

/// Errors that can occur when loading a matched-feature table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read table {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse JSON table: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("Unsupported table format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// A CSV row before validation
#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default)]
    src_distance_m: Option<String>,
    #[serde(default)]
    dst_distance_m_aligned: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    type_norm: Option<String>,
    #[serde(default)]
    src_id: Option<String>,
    #[serde(default)]
    dst_id: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
}

/// A JSON row before validation
#[derive(Debug, Default, Deserialize)]
struct JsonRow {
    #[serde(default)]
    src_distance_m: Option<f64>,
    #[serde(default)]
    dst_distance_m_aligned: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    type_norm: Option<String>,
    #[serde(default)]
    src_id: Option<serde_json::Value>,
    #[serde(default)]
    dst_id: Option<serde_json::Value>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Load a table, choosing the parser from the file extension
pub fn load_table(path: &Path) -> Result<Vec<MatchedFeature>, TableError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = fs::read_to_string(path).map_err(|source| TableError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    match extension.as_str() {
        "csv" => parse_csv(&content),
        "json" => parse_json(&content),
        _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Parse CSV text with a header row
pub fn parse_csv(content: &str) -> Result<Vec<MatchedFeature>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let has_category = reader.headers()?.iter().any(|h| h == "category");

    let mut features = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = i + 1;
        let raw = result?;

        let src = parse_distance(raw.src_distance_m.as_deref(), "src_distance_m", row)?;
        let dst = parse_distance(
            raw.dst_distance_m_aligned.as_deref(),
            "dst_distance_m_aligned",
            row,
        )?;
        let confidence = match non_empty(raw.confidence.as_deref()) {
            Some(value) => value.parse::<f64>().map_err(|e| TableError::Malformed {
                row,
                message: format!("confidence '{}': {}", value, e),
            })?,
            None => 0.0,
        };

        features.push(MatchedFeature {
            src_distance_m: src,
            dst_distance_m_aligned: dst,
            category: category_cell(raw.category.as_deref(), has_category),
            type_norm: non_empty(raw.type_norm.as_deref())
                .map(FeatureType::from_label)
                .unwrap_or_default(),
            src_id: non_empty(raw.src_id.as_deref()).map(str::to_string),
            dst_id: non_empty(raw.dst_id.as_deref()).map(str::to_string),
            confidence,
        });
    }

    Ok(features)
}

/// Parse a JSON array of row objects
pub fn parse_json(content: &str) -> Result<Vec<MatchedFeature>, TableError> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(content)?;
    let has_category = objects.iter().any(|o| o.contains_key("category"));

    objects
        .into_iter()
        .enumerate()
        .map(|(i, object)| {
            let row = i + 1;
            let raw: JsonRow = serde_json::from_value(serde_json::Value::Object(object))?;
            let src = raw.src_distance_m.ok_or_else(|| missing("src_distance_m", row))?;
            let dst = raw
                .dst_distance_m_aligned
                .ok_or_else(|| missing("dst_distance_m_aligned", row))?;

            Ok(MatchedFeature {
                src_distance_m: src,
                dst_distance_m_aligned: dst,
                category: category_cell(raw.category.as_deref(), has_category),
                type_norm: raw
                    .type_norm
                    .as_deref()
                    .map(FeatureType::from_label)
                    .unwrap_or_default(),
                src_id: raw.src_id.and_then(id_to_string),
                dst_id: raw.dst_id.and_then(id_to_string),
                confidence: raw.confidence.unwrap_or(0.0),
            })
        })
        .collect()
}

fn category_cell(value: Option<&str>, has_column: bool) -> Category {
    match non_empty(value) {
        Some(label) => Category::from_label(label),
        None if has_column => Category::unlabelled(),
        None => Category::Matched,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn missing(column: &str, row: usize) -> TableError {
    TableError::Malformed {
        row,
        message: format!("missing {}", column),
    }
}

fn parse_distance(value: Option<&str>, column: &str, row: usize) -> Result<f64, TableError> {
    let value = non_empty(value).ok_or_else(|| missing(column, row))?;
    value.parse::<f64>().map_err(|e| TableError::Malformed {
        row,
        message: format!("{} '{}': {}", column, value, e),
    })
}

/// Ids may be written as numbers or strings upstream
fn id_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv_with_absent_cells() {
        let csv = "\
src_distance_m,dst_distance_m_aligned,category,type_norm,src_id,dst_id,confidence,extra
100.5,101.0,matched,Girth Weld,A1,B1,0.93,x
200,205.2,new,,,B2,,y
";
        let features = parse_csv(csv).unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].type_norm, FeatureType::GirthWeld);
        assert_eq!(features[0].src_id.as_deref(), Some("A1"));
        assert!((features[0].confidence - 0.93).abs() < 1e-9);

        assert_eq!(features[1].category, Category::New);
        assert_eq!(features[1].type_norm, FeatureType::Unknown);
        assert_eq!(features[1].src_id, None);
        assert_eq!(features[1].confidence, 0.0);
    }

    #[test]
    fn test_parse_csv_missing_category_column_defaults_to_matched() {
        let csv = "src_distance_m,dst_distance_m_aligned\n1,2\n";
        let features = parse_csv(csv).unwrap();
        assert_eq!(features[0].category, Category::Matched);
    }

    #[test]
    fn test_empty_category_cell_is_unlabelled() {
        let csv = "src_distance_m,dst_distance_m_aligned,category\n1,2,\n3,4,new\n";
        let features = parse_csv(csv).unwrap();

        assert!(features[0].category.is_unlabelled());
        assert!(!features[0].category.is_matched());
        assert_eq!(features[0].category.color(), crate::record::DEFAULT_CATEGORY_COLOR);
        assert_eq!(features[1].category, Category::New);

        let json = r#"[
            {"src_distance_m": 1, "dst_distance_m_aligned": 2, "category": null},
            {"src_distance_m": 3, "dst_distance_m_aligned": 4}
        ]"#;
        let features = parse_json(json).unwrap();
        assert!(features.iter().all(|f| f.category.is_unlabelled()));

        let json = r#"[{"src_distance_m": 1, "dst_distance_m_aligned": 2}]"#;
        assert!(parse_json(json).unwrap()[0].category.is_matched());
    }

    #[test]
    fn test_parse_csv_rejects_bad_distance() {
        let csv = "src_distance_m,dst_distance_m_aligned\n1,2\nabc,3\n";
        match parse_csv(csv) {
            Err(TableError::Malformed { row, message }) => {
                assert_eq!(row, 2);
                assert!(message.contains("src_distance_m"));
            }
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_numeric_ids() {
        let json = r#"[
            {"src_distance_m": 10, "dst_distance_m_aligned": 11, "category": "uncertain",
             "type_norm": "Valve", "src_id": 7, "dst_id": null, "confidence": 0.4}
        ]"#;
        let features = parse_json(json).unwrap();
        assert_eq!(features[0].category, Category::Uncertain);
        assert_eq!(features[0].src_id.as_deref(), Some("7"));
        assert_eq!(features[0].dst_id, None);
    }

    #[test]
    fn test_parse_json_missing_distance() {
        let json = r#"[{"src_distance_m": 10}]"#;
        assert!(matches!(
            parse_json(json),
            Err(TableError::Malformed { row: 1, .. })
        ));
    }

    #[test]
    fn test_load_table_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("matches.csv");
        let mut file = fs::File::create(&csv_path).unwrap();
        writeln!(file, "src_distance_m,dst_distance_m_aligned,category").unwrap();
        writeln!(file, "5,6,new").unwrap();
        assert_eq!(load_table(&csv_path).unwrap().len(), 1);

        let txt_path = dir.path().join("matches.txt");
        fs::write(&txt_path, "").unwrap();
        assert!(matches!(
            load_table(&txt_path),
            Err(TableError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            load_table(&dir.path().join("missing.csv")),
            Err(TableError::IoError { .. })
        ));
    }
}
