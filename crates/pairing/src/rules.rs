//! Naming rules that map one mate's file name to its partner's

use crate::descriptor::PatternKind;
use flowgate_core::{Error, Result};
use regex::Regex;

/// Recognised sequencing file suffixes, lowercase
pub const DEFAULT_SUFFIXES: &[&str] = &[
    ".fastq", ".fq", ".fasta", ".fa", ".fas", ".fastq.gz", ".fq.gz", ".fasta.gz", ".fa.gz",
    ".fas.gz", ".bam", ".sam",
];

/// Extension group shared by every default rule; may span several dots
const EXT: &str = r"((?:\.\w+)+)";

/// `(pattern, replacement, kind, description)` in evaluation order
const DEFAULT_RULES: &[(&str, &str, PatternKind, &str)] = &[
    (
        r"^(.+)_R1(_001)?EXT$",
        "${1}_R2${2}${3}",
        PatternKind::IlluminaR1R2,
        "sample_R1[_001].ext <-> sample_R2[_001].ext",
    ),
    (
        r"^(.+)_R2(_001)?EXT$",
        "${1}_R1${2}${3}",
        PatternKind::IlluminaR2R1,
        "sample_R2[_001].ext <-> sample_R1[_001].ext",
    ),
    (
        r"^(.+)_1(_001)?EXT$",
        "${1}_2${2}${3}",
        PatternKind::Numeric12,
        "sample_1[_001].ext <-> sample_2[_001].ext",
    ),
    (
        r"^(.+)_2(_001)?EXT$",
        "${1}_1${2}${3}",
        PatternKind::Numeric21,
        "sample_2[_001].ext <-> sample_1[_001].ext",
    ),
    (
        r"^(.+)_read1EXT$",
        "${1}_read2${2}",
        PatternKind::Unknown,
        "sample_read1.ext <-> sample_read2.ext",
    ),
    (
        r"^(.+)_read2EXT$",
        "${1}_read1${2}",
        PatternKind::Unknown,
        "sample_read2.ext <-> sample_read1.ext",
    ),
    (
        r"^(.+)\.R1EXT$",
        "${1}.R2${2}",
        PatternKind::Unknown,
        "sample.R1.ext <-> sample.R2.ext",
    ),
    (
        r"^(.+)\.R2EXT$",
        "${1}.R1${2}",
        PatternKind::Unknown,
        "sample.R2.ext <-> sample.R1.ext",
    ),
    (
        r"^(.+)_forwardEXT$",
        "${1}_reverse${2}",
        PatternKind::ForwardReverse,
        "sample_forward.ext <-> sample_reverse.ext",
    ),
    (
        r"^(.+)_reverseEXT$",
        "${1}_forward${2}",
        PatternKind::ReverseForward,
        "sample_reverse.ext <-> sample_forward.ext",
    ),
];

/// A case-insensitive rule computing the expected partner name
#[derive(Debug, Clone)]
pub struct PairRule {
    pattern: Regex,
    replacement: String,
    kind: PatternKind,
    description: String,
}

impl PairRule {
    /// Compile a rule; `replacement` uses `${n}` group references
    pub fn new(
        pattern: &str,
        replacement: impl Into<String>,
        kind: PatternKind,
        description: impl Into<String>,
    ) -> Result<Self> {
        let pattern = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
            Error::configuration(format!("invalid pairing pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
            kind,
            description: description.into(),
        })
    }

    /// The standard Illumina, numeric and forward/reverse conventions
    pub fn defaults() -> Result<Vec<Self>> {
        DEFAULT_RULES
            .iter()
            .map(|&(pattern, replacement, kind, description)| {
                Self::new(&pattern.replace("EXT", EXT), replacement, kind, description)
            })
            .collect()
    }

    /// Partner name for `name`, or `None` when the rule does not apply
    pub fn expected_partner(&self, name: &str) -> Option<String> {
        self.pattern
            .is_match(name)
            .then(|| self.pattern.replace(name, self.replacement.as_str()).into_owned())
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
