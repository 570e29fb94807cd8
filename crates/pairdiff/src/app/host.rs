//! Terminal implementation of the core's host capabilities

use pairdiff_core::host::read_file_lines;
use pairdiff_core::{
    AlignedPane, LayoutController, Line, PaneId, Renderer, ScrollOffset, Side, SourceId, SourceReader,
    StatusReporter, ViewportAccessor, WindowId,
};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::path::PathBuf;

/// The terminal shows a single window
pub const WINDOW: WindowId = WindowId(1);

/// Display state of one pane
#[derive(Debug, Default)]
pub struct PaneView {
    /// Tagged rows while a comparison is shown
    pub rows: Option<AlignedPane>,
    pub offset: ScrollOffset,
}

/// In-memory buffers, pane contents and viewports of the terminal UI.
///
/// Every viewport change is queued as a scroll event, the way an editor
/// reports both user and programmatic scrolling back to plugins.
#[derive(Debug, Default)]
pub struct TerminalHost {
    buffers: FxHashMap<String, Buffer>,
    /// Last content read per source, used for the single-pane view
    loaded: FxHashMap<SourceId, Vec<Line>>,
    left: PaneView,
    right: PaneView,
    two_pane: bool,
    viewport_height: usize,
    scroll_events: VecDeque<(PaneId, ScrollOffset)>,
    status: Option<String>,
}

#[derive(Debug)]
struct Buffer {
    lines: Vec<Line>,
    saved_as: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self {
            viewport_height: 1,
            ..Self::default()
        }
    }

    /// Register an in-memory buffer, optionally backed by a file on disk
    pub fn add_buffer(&mut self, name: impl Into<String>, lines: Vec<Line>, saved_as: Option<PathBuf>) {
        self.buffers.insert(name.into(), Buffer { lines, saved_as });
    }

    pub fn pane(&self, side: Side) -> &PaneView {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn pane_mut(&mut self, side: Side) -> &mut PaneView {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_two_pane(&self) -> bool {
        self.two_pane
    }

    /// Content of a source as last read, if any
    pub fn loaded(&self, source: &SourceId) -> Option<&[Line]> {
        self.loaded.get(source).map(Vec::as_slice)
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Number of rows a pane currently displays
    pub fn row_count(&self, side: Side, fallback: &SourceId) -> usize {
        match &self.pane(side).rows {
            Some(rows) => rows.len(),
            None => self.loaded(fallback).map_or(0, <[Line]>::len),
        }
    }

    pub fn next_scroll_event(&mut self) -> Option<(PaneId, ScrollOffset)> {
        self.scroll_events.pop_front()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

impl SourceReader for TerminalHost {
    fn read_lines(&mut self, source: &SourceId) -> pairdiff_core::Result<Vec<Line>> {
        let lines = match source {
            SourceId::Buffer(name) => self
                .buffers
                .get(name)
                .map(|buffer| buffer.lines.clone())
                .ok_or_else(|| pairdiff_core::CompareError::source_unavailable(source, "no such buffer"))?,
            SourceId::File(path) => read_file_lines(path)?,
        };
        self.loaded.insert(source.clone(), lines.clone());
        Ok(lines)
    }

    fn saved_path(&self, source: &SourceId) -> Option<PathBuf> {
        match source {
            SourceId::Buffer(name) => self.buffers.get(name)?.saved_as.clone(),
            SourceId::File(path) => Some(path.clone()),
        }
    }
}

impl Renderer for TerminalHost {
    fn apply_tags(&mut self, pane: PaneId, rows: &AlignedPane) {
        self.pane_mut(pane.side).rows = Some(rows.clone());
    }

    fn restore(&mut self, pane: PaneId) {
        self.pane_mut(pane.side).rows = None;
    }

    fn reveal_row(&mut self, pane: PaneId, row: usize) {
        let height = self.viewport_height;
        let current = self.pane(pane.side).offset;
        if row >= current.row && row < current.row + height {
            return;
        }
        // Center like vim's zz
        let offset = ScrollOffset::new(row.saturating_sub(height / 2), current.column);
        self.set_scroll_offset(pane, offset);
    }
}

impl LayoutController for TerminalHost {
    fn open_two_pane(&mut self, _window: WindowId) {
        self.two_pane = true;
    }

    fn close_to_single_pane(&mut self, _window: WindowId) {
        self.two_pane = false;
    }
}

impl ViewportAccessor for TerminalHost {
    fn get_scroll_offset(&self, pane: PaneId) -> ScrollOffset {
        self.pane(pane.side).offset
    }

    fn set_scroll_offset(&mut self, pane: PaneId, offset: ScrollOffset) {
        let view = self.pane_mut(pane.side);
        if view.offset == offset {
            return;
        }
        view.offset = offset;
        self.scroll_events.push_back((pane, offset));
    }
}

impl StatusReporter for TerminalHost {
    fn status_message(&mut self, _window: WindowId, message: &str) {
        tracing::debug!(message, "status");
        self.status = Some(message.to_string());
    }
}
