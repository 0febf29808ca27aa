//! The pairing pass and its scoring

use crate::descriptor::{FileDescriptor, PairGroup, PairingResult, PatternKind};
use crate::rules::{PairRule, DEFAULT_SUFFIXES};
use flowgate_core::{Error, Result, PAIRED_NAME_MARKER};
use regex::Regex;

/// Trailing pair indicator and everything after it
const INDICATOR_PATTERN: &str =
    r"(?i)(_R1|_R2|_1|_2|_read1|_read2|\.R1|\.R2|_forward|_reverse).*$";

/// Groups sequencing files into read pairs
#[derive(Debug, Clone)]
pub struct PairMatcher {
    /// Lowercase suffixes a candidate name must end with
    suffixes: Vec<String>,
    rules: Vec<PairRule>,
    indicator: Regex,
}

impl PairMatcher {
    /// Matcher with the default suffixes and rules
    pub fn new() -> Result<Self> {
        Self::with_rules(DEFAULT_SUFFIXES.iter().copied(), PairRule::defaults()?)
    }

    /// Matcher with custom suffixes and an ordered rule list
    pub fn with_rules<'a>(
        suffixes: impl IntoIterator<Item = &'a str>,
        rules: Vec<PairRule>,
    ) -> Result<Self> {
        let indicator = Regex::new(INDICATOR_PATTERN)
            .map_err(|e| Error::configuration(format!("invalid indicator pattern: {e}")))?;
        Ok(Self {
            suffixes: suffixes.into_iter().map(str::to_lowercase).collect(),
            rules,
            indicator,
        })
    }

    /// Human readable descriptions of the rules, in evaluation order
    pub fn supported_patterns(&self) -> Vec<&str> {
        self.rules.iter().map(PairRule::description).collect()
    }

    pub fn is_candidate(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Pair `files`; names without a recognised suffix are left out entirely
    ///
    /// Candidates are visited in input order. Each unpaired candidate takes
    /// the first rule that yields a partner name and the first other unpaired
    /// candidate carrying that name, compared case-insensitively.
    pub fn match_pairs(&self, files: &[FileDescriptor]) -> PairingResult {
        let candidates: Vec<&FileDescriptor> =
            files.iter().filter(|f| self.is_candidate(&f.name)).collect();
        let lowered: Vec<String> = candidates.iter().map(|f| f.name.to_lowercase()).collect();
        let mut consumed = vec![false; candidates.len()];
        let mut result = PairingResult::default();

        for index in 0..candidates.len() {
            if consumed[index] {
                continue;
            }

            match self.find_partner(index, &candidates, &lowered, &consumed) {
                Some((partner, kind)) => {
                    consumed[index] = true;
                    consumed[partner] = true;
                    let group_id = format!("pair_{}", result.paired_groups.len() + 1);
                    let group =
                        self.build_group(group_id, candidates[index], candidates[partner], kind);
                    result.paired_groups.push(group);
                }
                None => result.unpaired_files.push(candidates[index].clone()),
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            pairs = result.total_pairs(),
            unpaired = result.total_unpaired(),
            "paired sequencing files"
        );
        result
    }

    fn find_partner(
        &self,
        index: usize,
        candidates: &[&FileDescriptor],
        lowered: &[String],
        consumed: &[bool],
    ) -> Option<(usize, PatternKind)> {
        self.rules.iter().find_map(|rule| {
            let expected = rule.expected_partner(&candidates[index].name)?.to_lowercase();
            (0..candidates.len())
                .find(|&other| other != index && !consumed[other] && lowered[other] == expected)
                .map(|other| (other, rule.kind()))
        })
    }

    fn build_group(
        &self,
        group_id: String,
        primary: &FileDescriptor,
        secondary: &FileDescriptor,
        kind: PatternKind,
    ) -> PairGroup {
        PairGroup {
            group_id,
            confidence: confidence(primary, secondary, kind),
            suggested_name: self.suggested_name(&primary.name, &secondary.name),
            primary: primary.clone(),
            secondary: secondary.clone(),
            pattern_kind: kind,
        }
    }

    /// Shorter of the two indicator-free stems plus the paired marker
    pub fn suggested_name(&self, first: &str, second: &str) -> String {
        let a = self.indicator.replace(first, "");
        let b = self.indicator.replace(second, "");
        let stem = match a.len().cmp(&b.len()) {
            std::cmp::Ordering::Less => a,
            std::cmp::Ordering::Greater => b,
            std::cmp::Ordering::Equal => a.min(b),
        };
        format!("{stem}{PAIRED_NAME_MARKER}")
    }
}

/// Confidence that two files are mates, in `[0, 1]`
pub fn confidence(first: &FileDescriptor, second: &FileDescriptor, kind: PatternKind) -> f64 {
    let mut score = kind.naming_weight();

    if let (Some(a), Some(b)) = (first.size_bytes, second.size_bytes) {
        if a > 0 && b > 0 {
            score += a.min(b) as f64 / a.max(b) as f64 * 0.3;
        }
    }

    match (&first.data_type, &second.data_type) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => score += 0.2,
        _ => {}
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PairMatcher {
        PairMatcher::new().unwrap()
    }

    fn files(names: &[&str]) -> Vec<FileDescriptor> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| FileDescriptor::new(format!("f{i}"), *name))
            .collect()
    }

    #[test]
    fn test_suffix_filter_is_case_insensitive() {
        let m = matcher();
        assert!(m.is_candidate("READS.FASTQ.GZ"));
        assert!(m.is_candidate("aligned.bam"));
        assert!(!m.is_candidate("readme.txt"));
        assert!(!m.is_candidate("sample_R1.fastq.zip"));
    }

    #[test]
    fn test_suggested_name_prefers_shorter_stem() {
        let m = matcher();
        assert_eq!(m.suggested_name("test_R1.fastq", "test_R2.fastq"), "test_paired");
        assert_eq!(m.suggested_name("long_name_R1.fq", "x_R2.fq"), "x_paired");
        assert_eq!(m.suggested_name("b.R1.fq", "a.R2.fq"), "a_paired");
    }

    #[test]
    fn test_confidence_terms() {
        let a = FileDescriptor::new("1", "s_R1.fq")
            .with_size(100)
            .with_data_type("fastqsanger");
        let b = FileDescriptor::new("2", "s_R2.fq")
            .with_size(50)
            .with_data_type("fastqsanger");
        let score = confidence(&a, &b, PatternKind::IlluminaR1R2);
        assert!((score - (0.4 + 0.15 + 0.2)).abs() < 1e-9);

        let bare = confidence(
            &FileDescriptor::new("1", "s_1.fq"),
            &FileDescriptor::new("2", "s_2.fq"),
            PatternKind::Numeric12,
        );
        assert!((bare - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_zero_size_and_empty_type_add_nothing() {
        let a = FileDescriptor::new("1", "s_forward.fq").with_size(0).with_data_type("");
        let b = FileDescriptor::new("2", "s_reverse.fq").with_size(10).with_data_type("");
        assert_eq!(confidence(&a, &b, PatternKind::ForwardReverse), 0.0);
    }

    #[test]
    fn test_first_rule_wins_over_later_rules() {
        // "s_R1.R1.fq" matches both the `_R1` and the `.R1` rule
        let result = matcher().match_pairs(&files(&["s_R1.R1.fq", "s_R1.R2.fq", "s_R2.R1.fq"]));
        assert_eq!(result.total_pairs(), 1);
        let group = &result.paired_groups[0];
        assert_eq!(group.secondary.name, "s_R2.R1.fq");
        assert_eq!(group.pattern_kind, PatternKind::IlluminaR1R2);
        assert_eq!(result.unpaired_files[0].name, "s_R1.R2.fq");
    }

    #[test]
    fn test_supported_patterns_listed_in_order() {
        let m = matcher();
        let patterns = m.supported_patterns();
        assert_eq!(patterns.len(), 10);
        assert!(patterns[0].contains("_R1"));
    }
}
