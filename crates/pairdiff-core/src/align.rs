//! Alignment of an edit script into two equal-length, tagged panes

use crate::error::Result;
use crate::script::{validate_script, EditOp, EditTag};
use crate::source::Line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual category of one aligned row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowTag {
    Equal,
    /// Present only in the right source
    Added,
    /// Present only in the left source
    Deleted,
    /// Part of a replaced region
    Changed,
    /// Synthetic padding row with no source content
    Blank,
}

impl RowTag {
    /// Stable identifier for rendering integrations
    pub fn as_str(self) -> &'static str {
        match self {
            RowTag::Equal => "equal",
            RowTag::Added => "added",
            RowTag::Deleted => "deleted",
            RowTag::Changed => "changed",
            RowTag::Blank => "blank",
        }
    }

    pub fn is_equal(self) -> bool {
        self == RowTag::Equal
    }
}

impl fmt::Display for RowTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visual row of a pane
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignedRow {
    /// Source line content; empty for blank rows
    pub content: Line,
    pub tag: RowTag,
    /// 1-based number of the originating source line
    pub line_number: Option<usize>,
}

impl AlignedRow {
    fn source(content: &str, index: usize, tag: RowTag) -> Self {
        Self {
            content: content.to_string(),
            tag,
            line_number: Some(index + 1),
        }
    }

    fn blank() -> Self {
        Self {
            content: String::new(),
            tag: RowTag::Blank,
            line_number: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.tag == RowTag::Blank
    }
}

/// Ordered rows of one side of the comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignedPane {
    rows: Vec<AlignedRow>,
}

impl AlignedPane {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&AlignedRow> {
        self.rows.get(index)
    }

    pub fn tag(&self, index: usize) -> Option<RowTag> {
        self.rows.get(index).map(|row| row.tag)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignedRow> {
        self.rows.iter()
    }

    /// Content of every non-blank row, in order (the original source)
    pub fn source_lines(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| row.content.as_str())
            .collect()
    }

    pub fn count(&self, tag: RowTag) -> usize {
        self.rows.iter().filter(|row| row.tag == tag).count()
    }

    fn push(&mut self, row: AlignedRow) {
        self.rows.push(row);
    }
}

impl<'a> IntoIterator for &'a AlignedPane {
    type Item = &'a AlignedRow;
    type IntoIter = std::slice::Iter<'a, AlignedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Expand an edit script into left and right panes of identical length.
///
/// Row `i` of the left pane sits beside row `i` of the right pane. Replace
/// regions pair lines one-to-one; the surplus of the longer side stays
/// `Changed` and is faced by `Blank` padding.
pub fn build(left: &[Line], right: &[Line], ops: &[EditOp]) -> Result<(AlignedPane, AlignedPane)> {
    validate_script(ops, left.len(), right.len())?;

    let rows: usize = ops.iter().map(EditOp::row_span).sum();
    let mut left_pane = AlignedPane {
        rows: Vec::with_capacity(rows),
    };
    let mut right_pane = AlignedPane {
        rows: Vec::with_capacity(rows),
    };

    for op in ops {
        match op.tag {
            EditTag::Equal => {
                for (i, j) in op.left.clone().zip(op.right.clone()) {
                    left_pane.push(AlignedRow::source(&left[i], i, RowTag::Equal));
                    right_pane.push(AlignedRow::source(&right[j], j, RowTag::Equal));
                }
            }
            EditTag::Insert => {
                for j in op.right.clone() {
                    left_pane.push(AlignedRow::blank());
                    right_pane.push(AlignedRow::source(&right[j], j, RowTag::Added));
                }
            }
            EditTag::Delete => {
                for i in op.left.clone() {
                    left_pane.push(AlignedRow::source(&left[i], i, RowTag::Deleted));
                    right_pane.push(AlignedRow::blank());
                }
            }
            EditTag::Replace => {
                for k in 0..op.row_span() {
                    let i = op.left.start + k;
                    let j = op.right.start + k;
                    left_pane.push(if i < op.left.end {
                        AlignedRow::source(&left[i], i, RowTag::Changed)
                    } else {
                        AlignedRow::blank()
                    });
                    right_pane.push(if j < op.right.end {
                        AlignedRow::source(&right[j], j, RowTag::Changed)
                    } else {
                        AlignedRow::blank()
                    });
                }
            }
        }
    }

    debug_assert_eq!(left_pane.len(), right_pane.len());
    Ok((left_pane, right_pane))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use crate::script::{DiffAlgorithm, DiffEngine};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn align(left: &[String], right: &[String]) -> (AlignedPane, AlignedPane) {
        let ops = DiffEngine::new().diff_lines(left, right);
        build(left, right, &ops).unwrap()
    }

    fn tags(pane: &AlignedPane) -> Vec<RowTag> {
        pane.iter().map(|row| row.tag).collect()
    }

    #[test]
    fn test_changed_row() {
        let (l, r) = align(&lines(&["a", "b", "c"]), &lines(&["a", "x", "c"]));
        assert_eq!(l.len(), 3);
        assert_eq!(r.len(), 3);
        assert_eq!(tags(&l), vec![RowTag::Equal, RowTag::Changed, RowTag::Equal]);
        assert_eq!(tags(&r), vec![RowTag::Equal, RowTag::Changed, RowTag::Equal]);
        assert_eq!(l.row(1).unwrap().content, "b");
        assert_eq!(r.row(1).unwrap().content, "x");
    }

    #[test]
    fn test_deleted_row_padded_on_right() {
        let (l, r) = align(&lines(&["a", "b"]), &lines(&["a"]));
        assert_eq!(l.tag(1), Some(RowTag::Deleted));
        assert_eq!(l.row(1).unwrap().content, "b");
        assert_eq!(r.tag(1), Some(RowTag::Blank));
        assert_eq!(r.row(1).unwrap().content, "");
        assert_eq!(r.row(1).unwrap().line_number, None);
    }

    #[test]
    fn test_empty_left_is_all_blank() {
        let (l, r) = align(&[], &lines(&["x", "y"]));
        assert_eq!(tags(&l), vec![RowTag::Blank, RowTag::Blank]);
        assert_eq!(tags(&r), vec![RowTag::Added, RowTag::Added]);
    }

    #[test]
    fn test_empty_right_is_all_blank() {
        let (l, r) = align(&lines(&["x", "y"]), &[]);
        assert_eq!(tags(&l), vec![RowTag::Deleted, RowTag::Deleted]);
        assert_eq!(tags(&r), vec![RowTag::Blank, RowTag::Blank]);
    }

    #[test]
    fn test_uneven_replace_pads_shorter_side() {
        let left = lines(&["a", "b"]);
        let right = lines(&["x", "y", "z"]);
        let ops = vec![EditOp::new(EditTag::Replace, 0..2, 0..3)];
        let (l, r) = build(&left, &right, &ops).unwrap();
        assert_eq!(tags(&l), vec![RowTag::Changed, RowTag::Changed, RowTag::Blank]);
        assert_eq!(tags(&r), vec![RowTag::Changed, RowTag::Changed, RowTag::Changed]);
        assert_eq!(r.row(2).unwrap().line_number, Some(3));
    }

    #[test]
    fn test_line_numbers_follow_sources() {
        let (l, r) = align(&lines(&["a", "b", "c"]), &lines(&["new", "a", "c"]));
        let left_numbers: Vec<_> = l.iter().map(|row| row.line_number).collect();
        let right_numbers: Vec<_> = r.iter().map(|row| row.line_number).collect();
        assert_eq!(left_numbers, vec![None, Some(1), Some(2), Some(3)]);
        assert_eq!(right_numbers, vec![Some(1), Some(2), None, Some(3)]);
    }

    #[test]
    fn test_reconstruction_and_equal_length() {
        let cases = [
            (vec!["a", "b", "c"], vec!["a", "x", "c"]),
            (vec![], vec!["only", "right"]),
            (vec!["only", "left"], vec![]),
            (vec!["1", "2", "3", "4", "5"], vec!["0", "2", "3", "x", "y", "5", "6"]),
            (vec!["dup", "dup", "dup"], vec!["dup", "other", "dup"]),
            (vec!["", "", "x"], vec!["x", "", ""]),
        ];
        for (left, right) in cases {
            let left = lines(&left);
            let right = lines(&right);
            for algorithm in [
                DiffAlgorithm::MatchingBlocks,
                DiffAlgorithm::Histogram,
                DiffAlgorithm::Myers,
            ] {
                let ops = DiffEngine::new().with_algorithm(algorithm).diff_lines(&left, &right);
                let (l, r) = build(&left, &right, &ops).unwrap();
                assert_eq!(l.len(), r.len());
                assert_eq!(l.source_lines(), left);
                assert_eq!(r.source_lines(), right);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let left = lines(&["a", "b", "a", "c"]);
        let right = lines(&["b", "a", "c", "a"]);
        assert_eq!(align(&left, &right), align(&left, &right));
    }

    #[test]
    fn test_rejects_script_that_does_not_cover_inputs() {
        let ops = vec![EditOp::new(EditTag::Equal, 0..1, 0..1)];
        let err = build(&lines(&["a", "b"]), &lines(&["a"]), &ops).unwrap_err();
        assert!(matches!(err, CompareError::InvalidInput { .. }));
    }

    #[test]
    fn test_tag_identifiers_are_stable() {
        assert_eq!(RowTag::Added.as_str(), "added");
        assert_eq!(RowTag::Deleted.to_string(), "deleted");
        assert_eq!(serde_json::to_string(&RowTag::Changed).unwrap(), "\"changed\"");
        assert_eq!(serde_json::to_string(&RowTag::Blank).unwrap(), "\"blank\"");
    }
}
