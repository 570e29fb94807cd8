//! Grouping of aligned rows into navigable diff blocks

use crate::align::AlignedPane;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open range of aligned rows that differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffBlock {
    pub start: usize,
    pub end: usize,
}

impl DiffBlock {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.start..self.end).contains(&row)
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Collect maximal runs of rows whose tag is not `Equal` on either pane.
pub fn index(left: &AlignedPane, right: &AlignedPane) -> Vec<DiffBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<usize> = None;
    let rows = left.len().min(right.len());

    for (row, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let active = !l.tag.is_equal() || !r.tag.is_equal();
        match (active, open) {
            (true, None) => open = Some(row),
            (false, Some(start)) => {
                blocks.push(DiffBlock::new(start, row));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        blocks.push(DiffBlock::new(start, rows));
    }
    blocks
}

/// Index of the block containing `row`, if any
pub fn block_at(blocks: &[DiffBlock], row: usize) -> Option<usize> {
    let idx = blocks.partition_point(|block| block.end <= row);
    blocks
        .get(idx)
        .filter(|block| block.contains(row))
        .map(|_| idx)
}
