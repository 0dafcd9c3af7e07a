//! Survey run pairs
//!
//! Two run pairs are supported. Any identifier other than `2007_to_2015`
//! selects the 2015 -> 2022 pair; callers relying on strict validation must
//! check [`RunPair::is_known_id`] themselves.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::record::MatchedFeature;

/// A pair of ILI survey runs compared in one diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPair {
    /// 2007 run aligned onto the 2015 run
    Run2007To2015,
    /// 2015 run aligned onto the 2022 run
    Run2015To2022,
}

impl RunPair {
    pub const ALL: [RunPair; 2] = [RunPair::Run2007To2015, RunPair::Run2015To2022];

    /// Select a pair by identifier, falling back to 2015 -> 2022
    pub fn from_id(id: &str) -> Self {
        match id {
            "2007_to_2015" => RunPair::Run2007To2015,
            _ => RunPair::Run2015To2022,
        }
    }

    /// Whether `id` names a pair without relying on the fallback
    pub fn is_known_id(id: &str) -> bool {
        RunPair::ALL.iter().any(|p| p.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            RunPair::Run2007To2015 => "2007_to_2015",
            RunPair::Run2015To2022 => "2015_to_2022",
        }
    }

    pub fn src_year(&self) -> &'static str {
        match self {
            RunPair::Run2007To2015 => "2007",
            RunPair::Run2015To2022 => "2015",
        }
    }

    pub fn dst_year(&self) -> &'static str {
        match self {
            RunPair::Run2007To2015 => "2015",
            RunPair::Run2015To2022 => "2022",
        }
    }

    /// `ili_alignment_<src>_to_<dst>.html`
    pub fn output_file_name(&self) -> String {
        format!("ili_alignment_{}_to_{}.html", self.src_year(), self.dst_year())
    }
}

impl Serialize for RunPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl fmt::Display for RunPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.src_year(), self.dst_year())
    }
}

/// Everything needed to render one diagram
#[derive(Debug, Clone)]
pub struct PairJob {
    pub pair: RunPair,
    pub table: Vec<MatchedFeature>,
    pub output_dir: PathBuf,
}

impl PairJob {
    pub fn new(pair: RunPair, table: Vec<MatchedFeature>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            pair,
            table,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.pair.output_file_name())
    }
}
