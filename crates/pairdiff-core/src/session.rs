//! Per-window comparison state and block navigation

use crate::align::{self, AlignedPane};
use crate::blocks::{self, DiffBlock};
use crate::error::{CompareError, Result};
use crate::script::{DiffEngine, ScriptStats};
use crate::source::{Line, SourceId};
use serde::{Deserialize, Serialize};

/// Lifecycle of a session. A window without a session is uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    /// Terminal; the session is discarded, never reused
    Cleared,
}

/// Position of the cursor after navigating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPosition {
    /// 0-based index into the block list
    pub index: usize,
    pub total: usize,
    pub block: DiffBlock,
}

impl BlockPosition {
    /// "2/5" style counter (1-based)
    pub fn counter(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }
}

/// Frozen result of one comparison
#[derive(Debug, Clone)]
struct Snapshot {
    left: AlignedPane,
    right: AlignedPane,
    blocks: Vec<DiffBlock>,
    stats: ScriptStats,
}

/// One active two-source comparison
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    left_source: SourceId,
    right_source: SourceId,
    state: SessionState,
    /// Released on clear
    snapshot: Option<Snapshot>,
    current_block: Option<usize>,
}

impl ComparisonSession {
    /// Run edit script, alignment and block indexing, producing an active session.
    ///
    /// A missing side fails with `ComparisonFailed` wrapping `InvalidInput`.
    pub fn open(
        left_source: SourceId,
        right_source: SourceId,
        left_lines: Option<Vec<Line>>,
        right_lines: Option<Vec<Line>>,
        engine: &DiffEngine,
    ) -> Result<Self> {
        let snapshot = Self::snapshot(left_lines.as_deref(), right_lines.as_deref(), engine)
            .map_err(CompareError::comparison_failed)?;

        tracing::debug!(
            left = %left_source,
            right = %right_source,
            rows = snapshot.left.len(),
            blocks = snapshot.blocks.len(),
            algorithm = engine.algorithm().name(),
            "comparison session opened"
        );

        Ok(Self {
            left_source,
            right_source,
            state: SessionState::Active,
            snapshot: Some(snapshot),
            current_block: None,
        })
    }

    fn snapshot(left: Option<&[Line]>, right: Option<&[Line]>, engine: &DiffEngine) -> Result<Snapshot> {
        let ops = engine.compute(left, right)?;
        let (left, right) = (left.unwrap_or_default(), right.unwrap_or_default());
        let (left_pane, right_pane) = align::build(left, right, &ops)?;
        let blocks = blocks::index(&left_pane, &right_pane);
        Ok(Snapshot {
            left: left_pane,
            right: right_pane,
            blocks,
            stats: ScriptStats::from_ops(&ops),
        })
    }

    pub fn left_source(&self) -> &SourceId {
        &self.left_source
    }

    pub fn right_source(&self) -> &SourceId {
        &self.right_source
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Left aligned pane; None once cleared
    pub fn left_pane(&self) -> Option<&AlignedPane> {
        self.snapshot.as_ref().map(|s| &s.left)
    }

    pub fn right_pane(&self) -> Option<&AlignedPane> {
        self.snapshot.as_ref().map(|s| &s.right)
    }

    pub fn blocks(&self) -> &[DiffBlock] {
        self.snapshot.as_ref().map(|s| s.blocks.as_slice()).unwrap_or(&[])
    }

    pub fn stats(&self) -> ScriptStats {
        self.snapshot.as_ref().map(|s| s.stats).unwrap_or_default()
    }

    /// Number of aligned rows (identical for both panes)
    pub fn row_count(&self) -> usize {
        self.snapshot.as_ref().map(|s| s.left.len()).unwrap_or(0)
    }

    pub fn current_block_index(&self) -> Option<usize> {
        self.current_block
    }

    pub fn current_block(&self) -> Option<DiffBlock> {
        self.current_block.and_then(|idx| self.blocks().get(idx).copied())
    }

    /// Move to the next block, wrapping from last to first
    pub fn next_block(&mut self) -> Result<BlockPosition> {
        let total = self.navigable_blocks()?;
        let index = match self.current_block {
            None => 0,
            Some(idx) => (idx + 1) % total,
        };
        Ok(self.select(index, total))
    }

    /// Move to the previous block, wrapping from first to last
    pub fn previous_block(&mut self) -> Result<BlockPosition> {
        let total = self.navigable_blocks()?;
        let index = match self.current_block {
            None | Some(0) => total - 1,
            Some(idx) => idx - 1,
        };
        Ok(self.select(index, total))
    }

    fn navigable_blocks(&self) -> Result<usize> {
        if !self.is_active() {
            return Err(CompareError::NoActiveSession);
        }
        match self.blocks().len() {
            0 => Err(CompareError::NoBlocks),
            total => Ok(total),
        }
    }

    fn select(&mut self, index: usize, total: usize) -> BlockPosition {
        self.current_block = Some(index);
        BlockPosition {
            index,
            total,
            block: self.blocks()[index],
        }
    }

    /// Release the aligned panes and block list.
    ///
    /// Returns true when this call performed the transition; later calls are no-ops.
    pub fn clear(&mut self) -> bool {
        if self.state == SessionState::Cleared {
            return false;
        }
        self.state = SessionState::Cleared;
        self.snapshot = None;
        self.current_block = None;
        tracing::debug!(left = %self.left_source, right = %self.right_source, "comparison session cleared");
        true
    }
}
