//! Scroll synchronization between the two panes of a comparison
//!
//! Both panes are padded to the same row count, so an offset in one pane maps
//! to the identical offset in the other. The synchronizer mirrors each scroll
//! event onto the peer pane and swallows the echo the host posts back for
//! that programmatic move, which keeps the two panes from ping-ponging.
//! Several echoes may be outstanding at once, so they are tracked per pane.

use crate::error::{CompareError, Result};
use crate::host::{PaneId, ViewportAccessor};
use crate::session::ComparisonSession;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Outstanding echoes kept per pane; hosts that drop echoes cannot grow it further
const MAX_PENDING_ECHOES: usize = 16;

/// Viewport position of a pane, in aligned rows and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub row: usize,
    pub column: usize,
}

impl ScrollOffset {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn at_row(row: usize) -> Self {
        Self { row, column: 0 }
    }
}

/// Offset to apply to a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollAction {
    pub target: PaneId,
    pub offset: ScrollOffset,
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    enabled: bool,
    /// Offsets written to each pane whose echoes have not arrived yet, oldest first
    pending: FxHashMap<PaneId, VecDeque<ScrollOffset>>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self {
            enabled: true,
            pending: FxHashMap::default(),
        }
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.pending.clear();
    }

    /// The move a scroll event calls for, without touching any viewport
    pub fn plan(session: &ComparisonSession, source: PaneId, offset: ScrollOffset) -> Option<ScrollAction> {
        session.is_active().then(|| ScrollAction {
            target: source.peer(),
            offset,
        })
    }

    /// Mark a programmatic move so its echo is not propagated back
    pub fn expect_echo(&mut self, action: ScrollAction) {
        let queue = self.pending.entry(action.target).or_default();
        if queue.len() == MAX_PENDING_ECHOES {
            queue.pop_front();
        }
        queue.push_back(action.offset);
    }

    /// Consume the expectation matching an event, along with any older ones
    /// on the same pane the host coalesced away.
    fn take_echo(&mut self, source: PaneId, offset: ScrollOffset) -> bool {
        let Some(queue) = self.pending.get_mut(&source) else {
            return false;
        };
        let Some(position) = queue.iter().position(|&pending| pending == offset) else {
            return false;
        };
        queue.drain(..=position);
        if queue.is_empty() {
            self.pending.remove(&source);
        }
        true
    }

    /// Number of programmatic moves still awaiting their echo
    pub fn pending_echoes(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }

    /// Handle a scroll event from `source`, mirroring it onto the peer pane.
    ///
    /// Returns the applied action, or None when the event was an echo, the
    /// peer was already in place, or sync is disabled.
    pub fn on_scroll<V: ViewportAccessor + ?Sized>(
        &mut self,
        session: &ComparisonSession,
        source: PaneId,
        offset: ScrollOffset,
        viewport: &mut V,
    ) -> Result<Option<ScrollAction>> {
        if !session.is_active() {
            return Err(CompareError::NoActiveSession);
        }
        if !self.enabled {
            return Ok(None);
        }
        if self.take_echo(source, offset) {
            tracing::trace!(?source, ?offset, "scroll echo suppressed");
            return Ok(None);
        }

        let Some(action) = Self::plan(session, source, offset) else {
            return Ok(None);
        };
        if viewport.get_scroll_offset(action.target) == action.offset {
            return Ok(None);
        }

        self.expect_echo(action);
        viewport.set_scroll_offset(action.target, action.offset);
        tracing::trace!(?source, target = ?action.target, ?offset, "scroll mirrored");
        Ok(Some(action))
    }
}
