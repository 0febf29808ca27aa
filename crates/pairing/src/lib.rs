//! Detection of paired-end read files among uploaded datasets.
//!
//! [`PairMatcher::match_pairs`] is a pure function over a list of
//! [`FileDescriptor`]s: candidates are filtered by suffix, then paired in
//! input order using an ordered list of naming rules.

pub mod descriptor;
pub mod matcher;
pub mod rules;

pub use descriptor::{FileDescriptor, PairGroup, PairingResult, PatternKind};
pub use matcher::{confidence, PairMatcher};
pub use rules::{PairRule, DEFAULT_SUFFIXES};
