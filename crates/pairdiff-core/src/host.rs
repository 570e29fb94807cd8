//! Capabilities the core consumes from the host editor

use crate::align::AlignedPane;
use crate::error::{CompareError, Result};
use crate::source::{decode_lines, Line, SourceId};
use crate::sync::ScrollOffset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Host window identity; each window holds at most one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn peer(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One of the two panes of a window's comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId {
    pub window: WindowId,
    pub side: Side,
}

impl PaneId {
    pub fn left(window: WindowId) -> Self {
        Self {
            window,
            side: Side::Left,
        }
    }

    pub fn right(window: WindowId) -> Self {
        Self {
            window,
            side: Side::Right,
        }
    }

    pub fn peer(self) -> Self {
        Self {
            window: self.window,
            side: self.side.peer(),
        }
    }
}

/// Supplies source content
pub trait SourceReader {
    /// Read a source as lines. Fails with `SourceUnavailable` (or `InvalidInput` for binary content).
    fn read_lines(&mut self, source: &SourceId) -> Result<Vec<Line>>;

    /// On-disk location backing a source, if it has been saved
    fn saved_path(&self, source: &SourceId) -> Option<PathBuf> {
        source.path().map(Path::to_path_buf)
    }
}

/// Paints aligned panes
pub trait Renderer {
    /// Show the padded rows of a pane, styled per tag
    fn apply_tags(&mut self, pane: PaneId, rows: &AlignedPane);
    /// Drop padding and tags, showing the pane's original content again
    fn restore(&mut self, pane: PaneId);
    /// Bring an aligned row into view
    fn reveal_row(&mut self, pane: PaneId, row: usize);
}

pub trait LayoutController {
    fn open_two_pane(&mut self, window: WindowId);
    fn close_to_single_pane(&mut self, window: WindowId);
}

pub trait ViewportAccessor {
    fn get_scroll_offset(&self, pane: PaneId) -> ScrollOffset;
    fn set_scroll_offset(&mut self, pane: PaneId, offset: ScrollOffset);
}

/// Transient messages for the UI layer
pub trait StatusReporter {
    fn status_message(&mut self, _window: WindowId, _message: &str) {}
}

/// Everything a workspace needs from its host
pub trait Host: SourceReader + Renderer + LayoutController + ViewportAccessor + StatusReporter {}

impl<T> Host for T where T: SourceReader + Renderer + LayoutController + ViewportAccessor + StatusReporter {}

/// Read a file from disk as lines, mapping failures to `SourceUnavailable`
pub fn read_file_lines(path: &Path) -> Result<Vec<Line>> {
    let bytes = std::fs::read(path)
        .map_err(|e| CompareError::source_unavailable(path.display(), e.to_string()))?;
    decode_lines(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_panes() {
        let window = WindowId(7);
        assert_eq!(PaneId::left(window).peer(), PaneId::right(window));
        assert_eq!(PaneId::right(window).peer().side, Side::Left);
        assert_eq!(window.to_string(), "window#7");
    }

    #[test]
    fn test_read_missing_file_is_unavailable() {
        let err = read_file_lines(Path::new("/nonexistent/pairdiff/missing.txt")).unwrap_err();
        assert!(matches!(err, CompareError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_read_directory_is_unavailable() {
        let dir = std::env::temp_dir();
        match read_file_lines(&dir).unwrap_err() {
            CompareError::SourceUnavailable { source_id, reason } => {
                assert_eq!(source_id, dir.display().to_string());
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_read_file_lines() {
        let path = std::env::temp_dir().join(format!("pairdiff-host-{}.txt", std::process::id()));
        std::fs::write(&path, "one\ntwo\n").unwrap();
        let lines = read_file_lines(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(lines, vec!["one", "two"]);
    }
}
