use flowgate_core::HIGH_CONFIDENCE_THRESHOLD;
use flowgate_pairing::{confidence, FileDescriptor, PairMatcher, PatternKind};
use proptest::prelude::*;

fn files(names: &[&str]) -> Vec<FileDescriptor> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| FileDescriptor::new(format!("ds-{i}"), *name))
        .collect()
}

fn names(files: &[FileDescriptor]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_illumina_pair_and_unpaired_file() {
    let matcher = PairMatcher::new().unwrap();
    let result = matcher.match_pairs(&files(&["test_R1.fastq", "test_R2.fastq", "unpaired.fastq"]));

    assert_eq!(result.total_pairs(), 1);
    let group = &result.paired_groups[0];
    assert_eq!(group.group_id, "pair_1");
    assert_eq!(group.primary.name, "test_R1.fastq");
    assert_eq!(group.secondary.name, "test_R2.fastq");
    assert_eq!(group.pattern_kind, PatternKind::IlluminaR1R2);
    assert_eq!(group.suggested_name, "test_paired");
    assert_eq!(names(&result.unpaired_files), vec!["unpaired.fastq"]);
}

#[test]
fn test_numeric_pair_with_compressed_extension() {
    let matcher = PairMatcher::new().unwrap();
    let result = matcher.match_pairs(&files(&["a_1.fq.gz", "a_2.fq.gz"]));

    assert_eq!(result.total_pairs(), 1);
    assert_eq!(result.paired_groups[0].pattern_kind, PatternKind::Numeric12);
    assert_eq!(result.paired_groups[0].suggested_name, "a_paired");
    assert_eq!(result.total_unpaired(), 0);
}

#[test]
fn test_unrecognised_suffix_excluded_everywhere() {
    let matcher = PairMatcher::new().unwrap();
    let result = matcher.match_pairs(&files(&["readme.txt", "notes_R1.txt", "notes_R2.txt"]));
    assert_eq!(result.total_pairs(), 0);
    assert_eq!(result.total_unpaired(), 0);
}

#[test]
fn test_reverse_order_input_reports_r2_r1() {
    let matcher = PairMatcher::new().unwrap();
    let result = matcher.match_pairs(&files(&["s_R2.fq", "S_r1.FQ"]));
    assert_eq!(result.total_pairs(), 1);
    assert_eq!(result.paired_groups[0].pattern_kind, PatternKind::IlluminaR2R1);
}

#[test]
fn test_duplicates_are_never_double_consumed() {
    let matcher = PairMatcher::new().unwrap();

    let result = matcher.match_pairs(&files(&["x_R1.fq", "x_R2.fq", "x_R2.fq"]));
    assert_eq!(result.total_pairs(), 1);
    assert_eq!(result.paired_groups[0].secondary.id, "ds-1");
    assert_eq!(result.unpaired_files.len(), 1);
    assert_eq!(result.unpaired_files[0].id, "ds-2");

    let result = matcher.match_pairs(&files(&["x_R1.fq", "x_R1.fq", "x_R2.fq", "x_R2.fq"]));
    assert_eq!(result.total_pairs(), 2);
    let pairs: Vec<(&str, &str)> = result
        .paired_groups
        .iter()
        .map(|g| (g.primary.id.as_str(), g.secondary.id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("ds-0", "ds-2"), ("ds-1", "ds-3")]);
    assert_eq!(result.paired_groups[1].group_id, "pair_2");

    let mut seen: Vec<&str> = pairs.iter().flat_map(|(a, b)| [*a, *b]).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_high_confidence_selection() {
    let matcher = PairMatcher::new().unwrap();
    let input = vec![
        FileDescriptor::new("1", "good_R1.fastq")
            .with_size(1000)
            .with_data_type("fastqsanger"),
        FileDescriptor::new("2", "good_R2.fastq")
            .with_size(990)
            .with_data_type("fastqsanger"),
        FileDescriptor::new("3", "weak_forward.fastq"),
        FileDescriptor::new("4", "weak_reverse.fastq"),
    ];
    let result = matcher.match_pairs(&input);

    assert_eq!(result.total_pairs(), 2);
    let strong = result.high_confidence(HIGH_CONFIDENCE_THRESHOLD);
    assert_eq!(strong.len(), 1);
    assert_eq!(strong[0].suggested_name, "good_paired");
    assert_eq!(result.paired_groups[1].confidence, 0.0);
}

#[test]
fn test_custom_suffixes() {
    let matcher = PairMatcher::with_rules([".txt"], flowgate_pairing::PairRule::defaults().unwrap())
        .unwrap();
    let result = matcher.match_pairs(&files(&["notes_R1.txt", "notes_R2.txt", "a_R1.fastq"]));
    assert_eq!(result.total_pairs(), 1);
    assert_eq!(result.total_unpaired(), 0);
}

proptest! {
    #[test]
    fn confidence_monotone_in_size_ratio(
        small in 1u64..1_000_000,
        grow in 0u64..1_000_000,
        big in 1u64..1_000_000,
    ) {
        let reference = FileDescriptor::new("a", "s_R1.fq").with_size(big.max(small + grow));
        let lower = FileDescriptor::new("b", "s_R2.fq").with_size(small);
        let higher = FileDescriptor::new("c", "s_R2.fq").with_size(small + grow);

        for kind in [PatternKind::IlluminaR1R2, PatternKind::Numeric12, PatternKind::Unknown] {
            let low = confidence(&reference, &lower, kind);
            let high = confidence(&reference, &higher, kind);
            prop_assert!(high >= low);
            prop_assert!((0.0..=1.0).contains(&high));
        }
    }

    #[test]
    fn confidence_monotone_in_data_type_match(size_a in 0u64..10_000, size_b in 0u64..10_000) {
        let a = FileDescriptor::new("a", "s_1.fq").with_size(size_a);
        let b = FileDescriptor::new("b", "s_2.fq").with_size(size_b);
        let without = confidence(&a, &b, PatternKind::Numeric12);
        let with = confidence(
            &a.clone().with_data_type("fastqsanger"),
            &b.clone().with_data_type("fastqsanger"),
            PatternKind::Numeric12,
        );
        prop_assert!(with >= without);
    }
}
