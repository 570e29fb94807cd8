//! Application state and logic

use crate::config::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pairdiff_core::{
    CompareError, CompareSummary, CompareWorkspace, DiffBlock, PaneId, ScrollOffset, Side, SourceId,
    SourceReader, StatusReporter, ViewportAccessor,
};
use unicode_width::UnicodeWidthStr;

mod host;

pub use host::{TerminalHost, WINDOW};

/// Columns moved per horizontal scroll step
const HORIZONTAL_STEP: usize = 4;
/// Rows moved per mouse wheel notch
const WHEEL_STEP: usize = 3;

/// What a (re-)compare compares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareTarget {
    /// Two sources side by side
    Pair { left: SourceId, right: SourceId },
    /// A buffer against its saved file
    Saved { buffer: SourceId },
}

/// The main application state
pub struct App {
    pub workspace: CompareWorkspace,
    pub host: TerminalHost,
    pub target: CompareTarget,
    /// Pane receiving keyboard scrolling
    pub focus: Side,
    pub show_help: bool,
    /// Hide the status bar
    pub zen_mode: bool,
    pub line_numbers: bool,
    /// Pattern repeated across padding rows
    pub blank_fill: String,
    pub palette: Palette,
    pub should_quit: bool,
}

impl App {
    pub fn new(workspace: CompareWorkspace, host: TerminalHost, target: CompareTarget) -> Self {
        Self {
            workspace,
            host,
            target,
            focus: Side::Left,
            show_help: false,
            zen_mode: false,
            line_numbers: true,
            blank_fill: "/".to_string(),
            palette: Palette::default(),
            should_quit: false,
        }
    }

    /// Run the comparison for the current target, replacing any shown one
    pub fn compare(&mut self) -> pairdiff_core::Result<CompareSummary> {
        let result = match &self.target {
            CompareTarget::Pair { left, right } => {
                self.workspace
                    .compare(&mut self.host, WINDOW, left.clone(), right.clone())
            }
            CompareTarget::Saved { buffer } => {
                self.workspace
                    .compare_saved(&mut self.host, WINDOW, buffer.clone())
            }
        };
        self.pump_scroll_events();
        result
    }

    /// Sources of the left and right pane
    pub fn sources(&self) -> (SourceId, SourceId) {
        match &self.target {
            CompareTarget::Pair { left, right } => (left.clone(), right.clone()),
            CompareTarget::Saved { buffer } => {
                let right = self
                    .host
                    .saved_path(buffer)
                    .map(SourceId::File)
                    .unwrap_or_else(|| buffer.clone());
                (buffer.clone(), right)
            }
        }
    }

    pub fn has_comparison(&self) -> bool {
        self.workspace.has_session(WINDOW)
    }

    /// Block under the navigation cursor, if any
    pub fn current_block(&self) -> Option<DiffBlock> {
        self.workspace.session(WINDOW)?.current_block()
    }

    /// "difference i/N" or "N difference(s)"
    pub fn block_counter(&self) -> Option<String> {
        let session = self.workspace.session(WINDOW)?;
        let total = session.blocks().len();
        Some(match session.current_block_index() {
            Some(index) => format!("difference {}/{}", index + 1, total),
            None => format!("{} difference(s)", total),
        })
    }

    /// Side scrolled by the keyboard; the single pane shows the right source
    pub fn active_side(&self) -> Side {
        if self.host.is_two_pane() {
            self.focus
        } else {
            Side::Right
        }
    }

    /// Feed queued viewport changes through the scroll synchronizer
    fn pump_scroll_events(&mut self) {
        while let Some((pane, offset)) = self.host.next_scroll_event() {
            match self.workspace.on_scroll(&mut self.host, pane, offset) {
                Ok(_) | Err(CompareError::NoActiveSession) => {}
                Err(err) => tracing::debug!(error = %err, "scroll sync failed"),
            }
        }
    }

    fn max_scroll(&self, side: Side) -> usize {
        let (_, right) = self.sources();
        let total = self.host.row_count(side, &right);
        total.saturating_sub(self.host.viewport_height())
    }

    fn max_line_width(&self, side: Side) -> usize {
        match &self.host.pane(side).rows {
            Some(rows) => rows.iter().map(|row| row.content.width()).max().unwrap_or(0),
            None => {
                let (_, right) = self.sources();
                self.host
                    .loaded(&right)
                    .map(|lines| lines.iter().map(|line| line.width()).max().unwrap_or(0))
                    .unwrap_or(0)
            }
        }
    }

    fn scroll_side_to(&mut self, side: Side, offset: ScrollOffset) {
        let pane = PaneId { window: WINDOW, side };
        self.host.set_scroll_offset(pane, offset);
        self.pump_scroll_events();
    }

    /// Scroll one pane vertically by `delta` rows
    pub fn scroll_side_by(&mut self, side: Side, delta: isize) {
        let pane = PaneId { window: WINDOW, side };
        let current = self.host.get_scroll_offset(pane);
        let row = current
            .row
            .saturating_add_signed(delta)
            .min(self.max_scroll(side));
        self.scroll_side_to(side, ScrollOffset::new(row, current.column));
    }

    pub fn scroll_down(&mut self) {
        self.scroll_side_by(self.active_side(), 1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_side_by(self.active_side(), -1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.host.viewport_height() / 2).max(1) as isize;
        self.scroll_side_by(self.active_side(), half);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.host.viewport_height() / 2).max(1) as isize;
        self.scroll_side_by(self.active_side(), -half);
    }

    pub fn goto_start(&mut self) {
        let side = self.active_side();
        let column = self.host.pane(side).offset.column;
        self.scroll_side_to(side, ScrollOffset::new(0, column));
    }

    pub fn goto_end(&mut self) {
        let side = self.active_side();
        let column = self.host.pane(side).offset.column;
        let row = self.max_scroll(side);
        self.scroll_side_to(side, ScrollOffset::new(row, column));
    }

    pub fn scroll_left(&mut self) {
        let side = self.active_side();
        let current = self.host.pane(side).offset;
        let column = current.column.saturating_sub(HORIZONTAL_STEP);
        self.scroll_side_to(side, ScrollOffset::new(current.row, column));
    }

    pub fn scroll_right(&mut self) {
        let side = self.active_side();
        let current = self.host.pane(side).offset;
        let column = (current.column + HORIZONTAL_STEP).min(self.max_line_width(side));
        self.scroll_side_to(side, ScrollOffset::new(current.row, column));
    }

    /// Mouse wheel over the terminal; the pane under the cursor scrolls
    pub fn wheel(&mut self, column: u16, width: u16, down: bool) {
        let side = if self.host.is_two_pane() && column < width / 2 {
            Side::Left
        } else {
            Side::Right
        };
        let step = WHEEL_STEP as isize;
        self.scroll_side_by(side, if down { step } else { -step });
    }

    pub fn toggle_focus(&mut self) {
        if self.host.is_two_pane() {
            self.focus = self.focus.peer();
        }
    }

    pub fn next_diff(&mut self) {
        let _ = self.workspace.next_diff(&mut self.host, WINDOW);
        self.pump_scroll_events();
    }

    pub fn prev_diff(&mut self) {
        let _ = self.workspace.previous_diff(&mut self.host, WINDOW);
        self.pump_scroll_events();
    }

    pub fn toggle_sync(&mut self) {
        let enabled = !self.workspace.sync_enabled();
        self.workspace.set_sync_enabled(enabled);
        let message = if enabled {
            "Compare: scroll sync on."
        } else {
            "Compare: scroll sync off."
        };
        self.host.status_message(WINDOW, message);
    }

    pub fn clear(&mut self) {
        self.workspace.clear(&mut self.host, WINDOW);
        self.pump_scroll_events();
    }

    /// Re-read both sources and replace the comparison
    pub fn recompare(&mut self) {
        if let Err(err) = self.compare() {
            tracing::warn!(error = %err, "re-compare failed");
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_zen(&mut self) {
        self.zen_mode = !self.zen_mode;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // status messages last until the next key
        self.host.clear_status();
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Down if alt => self.next_diff(),
            KeyCode::Up if alt => self.prev_diff(),
            KeyCode::Char('d') if ctrl => self.scroll_half_page_down(),
            KeyCode::Char('u') if ctrl => self.scroll_half_page_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::PageDown => {
                let page = self.host.viewport_height() as isize;
                self.scroll_side_by(self.active_side(), page);
            }
            KeyCode::PageUp => {
                let page = self.host.viewport_height() as isize;
                self.scroll_side_by(self.active_side(), -page);
            }
            KeyCode::Home | KeyCode::Char('g') => self.goto_start(),
            KeyCode::End | KeyCode::Char('G') => self.goto_end(),
            KeyCode::Left | KeyCode::Char('h') => self.scroll_left(),
            KeyCode::Right | KeyCode::Char('l') => self.scroll_right(),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Char('n') => self.next_diff(),
            KeyCode::Char('N') | KeyCode::Char('p') => self.prev_diff(),
            KeyCode::Char('s') => self.toggle_sync(),
            KeyCode::Char('c') => self.clear(),
            KeyCode::Char('r') => self.recompare(),
            KeyCode::Char('Z') => self.toggle_zen(),
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
    }
}
