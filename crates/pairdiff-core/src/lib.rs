//! pairdiff core - line-aligned two-pane diff engine
//!
//! Computes a line-level edit script between two sources, pads it into two
//! equal-length tagged panes, groups differing rows into navigable blocks,
//! and keeps one comparison session per host window.

pub mod align;
pub mod blocks;
pub mod error;
pub mod host;
mod matcher;
pub mod script;
pub mod session;
pub mod source;
pub mod sync;
pub mod workspace;

pub use align::{AlignedPane, AlignedRow, RowTag};
pub use blocks::DiffBlock;
pub use error::{CompareError, Result};
pub use host::{
    Host, LayoutController, PaneId, Renderer, Side, SourceReader, StatusReporter, ViewportAccessor,
    WindowId,
};
pub use script::{DiffAlgorithm, DiffEngine, EditOp, EditTag, ScriptStats};
pub use session::{BlockPosition, ComparisonSession, SessionState};
pub use source::{Line, SourceId};
pub use sync::{ScrollAction, ScrollOffset, ScrollSync};
pub use workspace::{CompareSummary, CompareWorkspace};
