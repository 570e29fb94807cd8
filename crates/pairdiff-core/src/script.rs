//! Edit-script computation between two line sequences

use crate::error::{CompareError, Result};
use crate::matcher::matching_blocks;
use crate::source::{split_lines, Line};
use imara_diff::{Algorithm, Diff, InternedInput, TokenSource};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Kind of an edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One edit operation with its half-open spans in both sources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditOp {
    pub tag: EditTag,
    pub left: Range<usize>,
    pub right: Range<usize>,
}

impl EditOp {
    pub fn new(tag: EditTag, left: Range<usize>, right: Range<usize>) -> Self {
        Self { tag, left, right }
    }

    /// Classify a gap between two matched regions. Returns None when both sides are empty.
    fn for_gap(left: Range<usize>, right: Range<usize>) -> Option<Self> {
        let tag = match (left.is_empty(), right.is_empty()) {
            (true, true) => return None,
            (false, false) => EditTag::Replace,
            (false, true) => EditTag::Delete,
            (true, false) => EditTag::Insert,
        };
        Some(Self { tag, left, right })
    }

    pub fn left_len(&self) -> usize {
        self.left.len()
    }

    pub fn right_len(&self) -> usize {
        self.right.len()
    }

    /// Number of aligned rows this op occupies once padded
    pub fn row_span(&self) -> usize {
        self.left_len().max(self.right_len())
    }
}

/// Line matching algorithm used to build the edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffAlgorithm {
    /// Recursive longest-matching-block search, earliest match wins ties
    #[default]
    MatchingBlocks,
    Histogram,
    Myers,
}

impl DiffAlgorithm {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "matching-blocks" | "matching_blocks" | "lcs" => Some(DiffAlgorithm::MatchingBlocks),
            "histogram" => Some(DiffAlgorithm::Histogram),
            "myers" => Some(DiffAlgorithm::Myers),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DiffAlgorithm::MatchingBlocks => "matching-blocks",
            DiffAlgorithm::Histogram => "histogram",
            DiffAlgorithm::Myers => "myers",
        }
    }
}

/// Summary counts of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptStats {
    /// Lines only present on the right
    pub insertions: usize,
    /// Lines only present on the left
    pub deletions: usize,
    /// Replace operations
    pub changes: usize,
}

impl ScriptStats {
    pub fn from_ops(ops: &[EditOp]) -> Self {
        ops.iter().fold(Self::default(), |mut stats, op| {
            match op.tag {
                EditTag::Equal => {}
                EditTag::Insert => stats.insertions += op.right_len(),
                EditTag::Delete => stats.deletions += op.left_len(),
                EditTag::Replace => {
                    stats.changes += 1;
                    stats.insertions += op.right_len();
                    stats.deletions += op.left_len();
                }
            }
            stats
        })
    }

    pub fn is_identical(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

/// Computes line-level edit scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    algorithm: DiffAlgorithm,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    /// Compute the edit script for two possibly absent sources
    pub fn compute(&self, left: Option<&[Line]>, right: Option<&[Line]>) -> Result<Vec<EditOp>> {
        let left = left.ok_or_else(|| CompareError::invalid_input("left source is absent"))?;
        let right = right.ok_or_else(|| CompareError::invalid_input("right source is absent"))?;
        Ok(self.diff_lines(left, right))
    }

    /// Split both texts into lines and diff them
    pub fn diff_strings(&self, left: &str, right: &str) -> Vec<EditOp> {
        self.diff_lines(&split_lines(left), &split_lines(right))
    }

    /// Compute the edit script for two line sequences.
    ///
    /// The result partitions both inputs exactly, in order.
    pub fn diff_lines(&self, left: &[Line], right: &[Line]) -> Vec<EditOp> {
        let matches: Vec<(Range<usize>, Range<usize>)> = match self.algorithm {
            DiffAlgorithm::MatchingBlocks => matching_blocks(left, right)
                .into_iter()
                .map(|m| (m.left..m.left + m.len, m.right..m.right + m.len))
                .collect(),
            DiffAlgorithm::Histogram => unchanged_regions(Algorithm::Histogram, left, right),
            DiffAlgorithm::Myers => unchanged_regions(Algorithm::Myers, left, right),
        };
        ops_from_matches(&matches, left.len(), right.len())
    }
}

/// Turn ordered matched regions into a gap-free script
fn ops_from_matches(
    matches: &[(Range<usize>, Range<usize>)],
    left_len: usize,
    right_len: usize,
) -> Vec<EditOp> {
    let mut ops = Vec::with_capacity(matches.len() * 2 + 1);
    let (mut i, mut j) = (0, 0);

    for (left, right) in matches {
        if let Some(op) = EditOp::for_gap(i..left.start, j..right.start) {
            ops.push(op);
        }
        if !left.is_empty() {
            ops.push(EditOp::new(EditTag::Equal, left.clone(), right.clone()));
        }
        i = left.end;
        j = right.end;
    }
    if let Some(op) = EditOp::for_gap(i..left_len, j..right_len) {
        ops.push(op);
    }
    ops
}

/// Line slice adapter so imara-diff can intern our lines directly
struct LineTokens<'a>(&'a [Line]);

impl<'a> TokenSource for LineTokens<'a> {
    type Token = &'a str;
    type Tokenizer = std::iter::Map<std::slice::Iter<'a, Line>, fn(&'a Line) -> &'a str>;

    fn tokenize(&self) -> Self::Tokenizer {
        self.0.iter().map(String::as_str as fn(&'a Line) -> &'a str)
    }

    fn estimate_tokens(&self) -> u32 {
        self.0.len() as u32
    }
}

/// Regions imara-diff leaves unchanged, as (left, right) ranges
fn unchanged_regions(
    algorithm: Algorithm,
    left: &[Line],
    right: &[Line],
) -> Vec<(Range<usize>, Range<usize>)> {
    let input = InternedInput::new(LineTokens(left), LineTokens(right));
    let diff = Diff::compute(algorithm, &input);

    let mut regions = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    for hunk in diff.hunks() {
        let before = hunk.before.start as usize..hunk.before.end as usize;
        let after = hunk.after.start as usize..hunk.after.end as usize;
        if before.start > i {
            regions.push((i..before.start, j..after.start));
        }
        i = before.end;
        j = after.end;
    }
    if i < left.len() {
        regions.push((i..left.len(), j..right.len()));
    }
    regions
}

/// Check that `ops` partitions `0..left_len` and `0..right_len` contiguously
pub fn validate_script(ops: &[EditOp], left_len: usize, right_len: usize) -> Result<()> {
    let (mut i, mut j) = (0, 0);
    for (n, op) in ops.iter().enumerate() {
        if op.left.start != i || op.right.start != j {
            return Err(CompareError::invalid_input(format!(
                "edit op {n} starts at ({}, {}), expected ({i}, {j})",
                op.left.start, op.right.start
            )));
        }
        if op.left.end < op.left.start || op.right.end < op.right.start {
            return Err(CompareError::invalid_input(format!("edit op {n} has a reversed range")));
        }
        let consistent = match op.tag {
            EditTag::Equal => op.left_len() == op.right_len() && op.left_len() > 0,
            EditTag::Insert => op.left.is_empty() && !op.right.is_empty(),
            EditTag::Delete => !op.left.is_empty() && op.right.is_empty(),
            EditTag::Replace => !op.left.is_empty() && !op.right.is_empty(),
        };
        if !consistent {
            return Err(CompareError::invalid_input(format!(
                "edit op {n} ({:?}) has spans {:?} / {:?}",
                op.tag, op.left, op.right
            )));
        }
        i = op.left.end;
        j = op.right.end;
    }
    if i != left_len || j != right_len {
        return Err(CompareError::invalid_input(format!(
            "edit script covers ({i}, {j}) of ({left_len}, {right_len}) lines"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const ALGORITHMS: [DiffAlgorithm; 3] = [
        DiffAlgorithm::MatchingBlocks,
        DiffAlgorithm::Histogram,
        DiffAlgorithm::Myers,
    ];

    #[test]
    fn test_replace_in_middle() {
        let ops = DiffEngine::new().diff_lines(&lines(&["a", "b", "c"]), &lines(&["a", "x", "c"]));
        assert_eq!(
            ops,
            vec![
                EditOp::new(EditTag::Equal, 0..1, 0..1),
                EditOp::new(EditTag::Replace, 1..2, 1..2),
                EditOp::new(EditTag::Equal, 2..3, 2..3),
            ]
        );
    }

    #[test]
    fn test_trailing_delete() {
        let ops = DiffEngine::new().diff_lines(&lines(&["a", "b"]), &lines(&["a"]));
        assert_eq!(
            ops,
            vec![
                EditOp::new(EditTag::Equal, 0..1, 0..1),
                EditOp::new(EditTag::Delete, 1..2, 1..1),
            ]
        );
    }

    #[test]
    fn test_empty_left_is_single_insert() {
        let ops = DiffEngine::new().diff_lines(&[], &lines(&["x", "y"]));
        assert_eq!(ops, vec![EditOp::new(EditTag::Insert, 0..0, 0..2)]);
    }

    #[test]
    fn test_both_empty_yields_no_ops() {
        for algorithm in ALGORITHMS {
            let ops = DiffEngine::new().with_algorithm(algorithm).diff_lines(&[], &[]);
            assert!(ops.is_empty());
        }
    }

    #[test]
    fn test_identical_is_single_equal() {
        let same = lines(&["a", "b", "c"]);
        for algorithm in ALGORITHMS {
            let ops = DiffEngine::new().with_algorithm(algorithm).diff_lines(&same, &same);
            assert_eq!(ops, vec![EditOp::new(EditTag::Equal, 0..3, 0..3)]);
        }
    }

    #[test]
    fn test_absent_source_is_invalid_input() {
        let engine = DiffEngine::new();
        let right = lines(&["a"]);
        let err = engine.compute(None, Some(&right)).unwrap_err();
        assert!(matches!(err, CompareError::InvalidInput { .. }));
        assert!(engine.compute(Some(&right), None).is_err());
    }

    #[test]
    fn test_every_algorithm_partitions_inputs() {
        let left = lines(&["fn main() {", "    a();", "    b();", "}", "", "tail"]);
        let right = lines(&["// header", "fn main() {", "    b();", "    c();", "}", "tail", "extra"]);
        for algorithm in ALGORITHMS {
            let ops = DiffEngine::new().with_algorithm(algorithm).diff_lines(&left, &right);
            validate_script(&ops, left.len(), right.len()).unwrap();
            for op in ops.iter().filter(|op| op.tag == EditTag::Equal) {
                assert_eq!(left[op.left.clone()], right[op.right.clone()]);
            }
        }
    }

    #[test]
    fn test_deterministic_output() {
        let left = lines(&["x", "a", "x", "b", "x"]);
        let right = lines(&["x", "b", "x", "a"]);
        let engine = DiffEngine::new();
        assert_eq!(engine.diff_lines(&left, &right), engine.diff_lines(&left, &right));
    }

    #[test]
    fn test_validate_rejects_gaps() {
        let ops = vec![
            EditOp::new(EditTag::Equal, 0..1, 0..1),
            EditOp::new(EditTag::Equal, 2..3, 2..3),
        ];
        assert!(validate_script(&ops, 3, 3).is_err());
        let short = vec![EditOp::new(EditTag::Equal, 0..1, 0..1)];
        assert!(validate_script(&short, 2, 1).is_err());
        let mislabeled = vec![EditOp::new(EditTag::Insert, 0..1, 0..1)];
        assert!(validate_script(&mislabeled, 1, 1).is_err());
    }

    #[test]
    fn test_stats() {
        let ops = DiffEngine::new().diff_strings("a\nb\nc\n", "a\nx\ny\nc\nd\n");
        let stats = ScriptStats::from_ops(&ops);
        assert_eq!(stats.changes, 1);
        assert_eq!(stats.deletions, 1);
        assert_eq!(stats.insertions, 3);
        assert!(!stats.is_identical());
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in ALGORITHMS {
            assert_eq!(DiffAlgorithm::parse(algorithm.name()), Some(algorithm));
        }
        assert_eq!(DiffAlgorithm::parse("patience"), None);
    }
}
