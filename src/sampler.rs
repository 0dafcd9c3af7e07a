//! Stratified sampling of matched features
//!
//! A diagram with hundreds of connectors is unreadable, so only a handful of
//! rows per category is plotted. Selection is seeded and therefore identical
//! across runs on the same table.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::record::MatchedFeature;

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SamplingConfig {
    /// Maximum rows in a sample
    #[serde(default = "default_cap")]
    pub cap: usize,

    /// Maximum rows drawn from each category
    #[serde(default = "default_per_category")]
    pub per_category: usize,

    /// Seed for the per-category draw
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_cap() -> usize {
    15
}

fn default_per_category() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            per_category: default_per_category(),
            seed: default_seed(),
        }
    }
}

/// Draw a representative sample of at most `config.cap` rows
///
/// Tables that already fit are returned unchanged. Larger tables are grouped
/// by category label (groups visited in label order, unlabelled rows left
/// out), up to
/// `config.per_category` rows are drawn from each group, and the
/// concatenation is truncated to `config.cap`.
pub fn sample_features(rows: &[MatchedFeature], config: &SamplingConfig) -> Vec<MatchedFeature> {
    if rows.len() <= config.cap {
        return rows.to_vec();
    }

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate().filter(|(_, r)| !r.category.is_unlabelled()) {
        groups.entry(row.category.as_str()).or_default().push(i);
    }

    let mut sample = Vec::with_capacity(config.cap);
    for members in groups.values() {
        // Fresh generator per group so each category's draw does not depend
        // on the sizes of the groups before it.
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let amount = config.per_category.min(members.len());

        let mut picked = index::sample(&mut rng, members.len(), amount).into_vec();
        picked.sort_unstable();

        sample.extend(picked.into_iter().map(|p| rows[members[p]].clone()));
    }

    sample.truncate(config.cap);
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    fn table(categories: &[(&str, usize)]) -> Vec<MatchedFeature> {
        let mut rows = Vec::new();
        for (label, count) in categories {
            for _ in 0..*count {
                let d = rows.len() as f64 * 100.0;
                rows.push(MatchedFeature::new(d, d + 3.0, Category::from_label(label)));
            }
        }
        rows
    }

    #[test]
    fn test_small_table_returned_unchanged() {
        let rows = table(&[("new", 3), ("matched", 4)]);
        let sample = sample_features(&rows, &SamplingConfig::default());
        assert_eq!(sample, rows);
    }

    #[test]
    fn test_exactly_cap_rows_returned_unchanged() {
        let rows = table(&[("matched", 15)]);
        let sample = sample_features(&rows, &SamplingConfig::default());
        assert_eq!(sample, rows);
    }

    #[test]
    fn test_empty_table() {
        assert!(sample_features(&[], &SamplingConfig::default()).is_empty());
    }

    #[test]
    fn test_four_full_categories_truncate_to_cap() {
        let rows = table(&[("matched", 5), ("uncertain", 5), ("new", 5), ("disappeared", 5)]);
        let sample = sample_features(&rows, &SamplingConfig::default());

        assert_eq!(sample.len(), 15);
        // Label order: disappeared, matched, new, uncertain. The last group
        // falls off the end.
        assert!(sample.iter().all(|r| r.category != Category::Uncertain));
        assert_eq!(
            sample.iter().filter(|r| r.category.is_matched()).count(),
            5
        );
    }

    #[test]
    fn test_large_table_sample_drawn_from_input_without_duplicates() {
        let rows = table(&[("matched", 40), ("new", 2), ("relocated", 12)]);
        let sample = sample_features(&rows, &SamplingConfig::default());

        assert!(sample.len() <= 15);
        assert_eq!(sample.len(), 12); // 5 matched + 2 new + 5 relocated
        for row in &sample {
            assert!(rows.contains(row));
        }
        let mut distances: Vec<i64> = sample.iter().map(|r| r.src_distance_m as i64).collect();
        distances.sort_unstable();
        distances.dedup();
        assert_eq!(distances.len(), sample.len());
    }

    #[test]
    fn test_small_category_contributes_all_rows() {
        let rows = table(&[("matched", 20), ("new", 2)]);
        let sample = sample_features(&rows, &SamplingConfig::default());
        assert_eq!(
            sample.iter().filter(|r| r.category == Category::New).count(),
            2
        );
    }

    #[test]
    fn test_unlabelled_rows_left_out_of_large_tables() {
        let rows = table(&[("matched", 20), ("", 4)]);
        let sample = sample_features(&rows, &SamplingConfig::default());

        assert_eq!(sample.len(), 5);
        assert!(sample.iter().all(|r| r.category.is_matched()));

        let small = table(&[("new", 2), ("", 1)]);
        assert_eq!(sample_features(&small, &SamplingConfig::default()), small);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let rows = table(&[("matched", 30), ("uncertain", 9), ("new", 7)]);
        let config = SamplingConfig::default();
        assert_eq!(sample_features(&rows, &config), sample_features(&rows, &config));
    }

    #[test]
    fn test_custom_cap() {
        let rows = table(&[("matched", 10), ("new", 10)]);
        let config = SamplingConfig {
            cap: 4,
            per_category: 3,
            seed: 7,
        };
        let sample = sample_features(&rows, &config);
        assert_eq!(sample.len(), 4);
        assert_eq!(sample.iter().filter(|r| r.category.is_matched()).count(), 3);
    }
}
