//! Input descriptors and pairing output

use serde::{Deserialize, Serialize};

/// An uploaded dataset considered for pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub size_bytes: Option<u64>,
    pub data_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_bytes: None,
            data_type: None,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

/// Naming convention that produced a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    IlluminaR1R2,
    IlluminaR2R1,
    #[serde(rename = "illumina_1_2")]
    Numeric12,
    #[serde(rename = "illumina_2_1")]
    Numeric21,
    ForwardReverse,
    ReverseForward,
    Unknown,
}

impl PatternKind {
    /// Weight of the naming convention in the confidence score
    pub const fn naming_weight(self) -> f64 {
        match self {
            PatternKind::IlluminaR1R2 | PatternKind::IlluminaR2R1 => 0.4,
            PatternKind::Numeric12 | PatternKind::Numeric21 => 0.3,
            PatternKind::ForwardReverse | PatternKind::ReverseForward | PatternKind::Unknown => 0.0,
        }
    }
}

/// Two mates of a paired-end read set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairGroup {
    pub group_id: String,
    /// The file that appeared first in the input
    pub primary: FileDescriptor,
    pub secondary: FileDescriptor,
    pub pattern_kind: PatternKind,
    /// Heuristic score in `[0, 1]`
    pub confidence: f64,
    pub suggested_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairingResult {
    pub paired_groups: Vec<PairGroup>,
    /// Candidates with no partner, in input order
    pub unpaired_files: Vec<FileDescriptor>,
}

impl PairingResult {
    pub fn total_pairs(&self) -> usize {
        self.paired_groups.len()
    }

    pub fn total_unpaired(&self) -> usize {
        self.unpaired_files.len()
    }

    /// Groups whose confidence reaches `threshold`
    pub fn high_confidence(&self, threshold: f64) -> Vec<&PairGroup> {
        self.paired_groups
            .iter()
            .filter(|group| group.confidence >= threshold)
            .collect()
    }
}
