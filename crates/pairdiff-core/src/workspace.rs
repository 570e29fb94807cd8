//! Registry of comparison sessions, one per host window
//!
//! This is the surface a front-end drives: compare, navigate, clear and
//! forward scroll events. Every operation runs to completion synchronously;
//! a failed compare leaves the window's previous session untouched.

use crate::error::{CompareError, Result};
use crate::host::{Host, PaneId, WindowId};
use crate::script::{DiffEngine, ScriptStats};
use crate::session::{BlockPosition, ComparisonSession};
use crate::source::SourceId;
use crate::sync::{ScrollAction, ScrollOffset, ScrollSync};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Outcome of a successful compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSummary {
    pub blocks: usize,
    pub rows: usize,
    pub stats: ScriptStats,
}

impl CompareSummary {
    pub fn message(&self) -> String {
        format!("Compare: {} difference(s) found.", self.blocks)
    }
}

struct SessionSlot {
    session: ComparisonSession,
    sync: ScrollSync,
}

pub struct CompareWorkspace {
    engine: DiffEngine,
    sync_enabled: bool,
    reveal_first_diff: bool,
    slots: FxHashMap<WindowId, SessionSlot>,
}

impl Default for CompareWorkspace {
    fn default() -> Self {
        Self::new(DiffEngine::new())
    }
}

impl CompareWorkspace {
    pub fn new(engine: DiffEngine) -> Self {
        Self {
            engine,
            sync_enabled: true,
            reveal_first_diff: true,
            slots: FxHashMap::default(),
        }
    }

    /// Scroll first block into view when a comparison opens (cursor stays unset)
    pub fn with_reveal_first_diff(mut self, reveal: bool) -> Self {
        self.reveal_first_diff = reveal;
        self
    }

    pub fn with_sync(mut self, enabled: bool) -> Self {
        self.set_sync_enabled(enabled);
        self
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Engine used by later compares; open sessions keep their snapshot
    pub fn set_engine(&mut self, engine: DiffEngine) {
        self.engine = engine;
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.sync_enabled = enabled;
        for slot in self.slots.values_mut() {
            slot.sync.set_enabled(enabled);
        }
    }

    pub fn session(&self, window: WindowId) -> Option<&ComparisonSession> {
        self.slots.get(&window).map(|slot| &slot.session)
    }

    pub fn has_session(&self, window: WindowId) -> bool {
        self.slots.contains_key(&window)
    }

    /// Windows with an active comparison, ascending
    pub fn windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self.slots.keys().copied().collect();
        windows.sort();
        windows
    }

    /// Compare two sources in `window`, replacing any comparison already there.
    pub fn compare<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        window: WindowId,
        left: SourceId,
        right: SourceId,
    ) -> Result<CompareSummary> {
        let session = match self.open_session(host, left, right) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(%window, error = %err, "compare failed; previous session kept");
                host.status_message(window, &format!("Compare: {}", err.root_cause()));
                return Err(err);
            }
        };

        if self.has_session(window) {
            tracing::debug!(%window, "replacing active comparison");
            self.teardown(host, window);
        }

        let summary = CompareSummary {
            blocks: session.blocks().len(),
            rows: session.row_count(),
            stats: session.stats(),
        };

        host.open_two_pane(window);
        if let (Some(left), Some(right)) = (session.left_pane(), session.right_pane()) {
            host.apply_tags(PaneId::left(window), left);
            host.apply_tags(PaneId::right(window), right);
        }
        if self.reveal_first_diff {
            if let Some(first) = session.blocks().first() {
                host.reveal_row(PaneId::left(window), first.start);
                host.reveal_row(PaneId::right(window), first.start);
            }
        }

        let mut sync = ScrollSync::new();
        sync.set_enabled(self.sync_enabled);
        self.slots.insert(window, SessionSlot { session, sync });

        tracing::info!(%window, blocks = summary.blocks, rows = summary.rows, "comparison installed");
        host.status_message(window, &summary.message());
        Ok(summary)
    }

    /// Compare a buffer's in-memory content (left) with its saved file (right)
    pub fn compare_saved<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        window: WindowId,
        buffer: SourceId,
    ) -> Result<CompareSummary> {
        let Some(path) = host.saved_path(&buffer) else {
            let err = CompareError::comparison_failed(CompareError::source_unavailable(
                &buffer,
                "file has not been saved yet",
            ));
            host.status_message(window, &format!("Compare: {}", err.root_cause()));
            return Err(err);
        };
        self.compare(host, window, buffer, SourceId::File(path))
    }

    fn open_session<H: Host + ?Sized>(
        &self,
        host: &mut H,
        left: SourceId,
        right: SourceId,
    ) -> Result<ComparisonSession> {
        let left_lines = host.read_lines(&left).map_err(CompareError::comparison_failed)?;
        let right_lines = host.read_lines(&right).map_err(CompareError::comparison_failed)?;
        ComparisonSession::open(left, right, Some(left_lines), Some(right_lines), &self.engine)
    }

    pub fn next_diff<H: Host + ?Sized>(&mut self, host: &mut H, window: WindowId) -> Result<BlockPosition> {
        self.navigate(host, window, ComparisonSession::next_block)
    }

    pub fn previous_diff<H: Host + ?Sized>(&mut self, host: &mut H, window: WindowId) -> Result<BlockPosition> {
        self.navigate(host, window, ComparisonSession::previous_block)
    }

    fn navigate<H, F>(&mut self, host: &mut H, window: WindowId, step: F) -> Result<BlockPosition>
    where
        H: Host + ?Sized,
        F: FnOnce(&mut ComparisonSession) -> Result<BlockPosition>,
    {
        let result = match self.slots.get_mut(&window) {
            Some(slot) => step(&mut slot.session),
            None => Err(CompareError::NoActiveSession),
        };
        match result {
            Ok(position) => {
                host.reveal_row(PaneId::left(window), position.block.start);
                host.reveal_row(PaneId::right(window), position.block.start);
                host.status_message(window, &format!("Compare: difference {}", position.counter()));
                Ok(position)
            }
            Err(err) => {
                tracing::debug!(%window, error = %err, "navigation ignored");
                host.status_message(window, navigation_message(&err));
                Err(err)
            }
        }
    }

    /// Tear down the window's comparison. Returns false when there was none.
    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H, window: WindowId) -> bool {
        let cleared = self.teardown(host, window);
        host.status_message(window, "Compare: cleared.");
        cleared
    }

    /// Forward a viewport change of one pane to the scroll synchronizer
    pub fn on_scroll<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pane: PaneId,
        offset: ScrollOffset,
    ) -> Result<Option<ScrollAction>> {
        let slot = self
            .slots
            .get_mut(&pane.window)
            .ok_or(CompareError::NoActiveSession)?;
        let SessionSlot { session, sync } = slot;
        sync.on_scroll(session, pane, offset, host)
    }

    /// The host closed the window; drop its session without touching the layout
    pub fn close_window(&mut self, window: WindowId) -> bool {
        match self.slots.remove(&window) {
            Some(mut slot) => {
                slot.session.clear();
                true
            }
            None => false,
        }
    }

    /// Tear down every comparison (host shutdown)
    pub fn clear_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for window in self.windows() {
            self.teardown(host, window);
        }
    }

    fn teardown<H: Host + ?Sized>(&mut self, host: &mut H, window: WindowId) -> bool {
        let Some(mut slot) = self.slots.remove(&window) else {
            return false;
        };
        slot.session.clear();
        host.restore(PaneId::left(window));
        host.restore(PaneId::right(window));
        host.close_to_single_pane(window);
        true
    }
}

fn navigation_message(err: &CompareError) -> &'static str {
    match err {
        CompareError::NoActiveSession => "Compare: no active comparison.",
        CompareError::NoBlocks => "Compare: no differences.",
        _ => "Compare: navigation failed.",
    }
}
