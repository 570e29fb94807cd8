use pairdiff_core::{
    AlignedPane, CompareError, CompareWorkspace, DiffBlock, LayoutController, Line, PaneId, Renderer,
    RowTag, ScrollOffset, SourceId, SourceReader, StatusReporter, ViewportAccessor, WindowId,
};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Apply(PaneId, Vec<RowTag>),
    Restore(PaneId),
    Reveal(PaneId, usize),
    OpenTwoPane(WindowId),
    CloseToSingle(WindowId),
}

#[derive(Default)]
struct FakeHost {
    sources: HashMap<SourceId, Vec<Line>>,
    saved: HashMap<SourceId, PathBuf>,
    offsets: HashMap<PaneId, ScrollOffset>,
    calls: Vec<Call>,
    messages: Vec<String>,
}

impl FakeHost {
    fn with_source(mut self, id: SourceId, lines: &[&str]) -> Self {
        self.sources
            .insert(id, lines.iter().map(|s| s.to_string()).collect());
        self
    }

    fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    fn last_message(&self) -> &str {
        self.messages.last().map(String::as_str).unwrap_or("")
    }
}

impl SourceReader for FakeHost {
    fn read_lines(&mut self, source: &SourceId) -> pairdiff_core::Result<Vec<Line>> {
        self.sources
            .get(source)
            .cloned()
            .ok_or_else(|| CompareError::source_unavailable(source, "not open"))
    }

    fn saved_path(&self, source: &SourceId) -> Option<PathBuf> {
        self.saved.get(source).cloned()
    }
}

impl Renderer for FakeHost {
    fn apply_tags(&mut self, pane: PaneId, rows: &AlignedPane) {
        self.calls
            .push(Call::Apply(pane, rows.iter().map(|r| r.tag).collect()));
    }

    fn restore(&mut self, pane: PaneId) {
        self.calls.push(Call::Restore(pane));
    }

    fn reveal_row(&mut self, pane: PaneId, row: usize) {
        self.calls.push(Call::Reveal(pane, row));
    }
}

impl LayoutController for FakeHost {
    fn open_two_pane(&mut self, window: WindowId) {
        self.calls.push(Call::OpenTwoPane(window));
    }

    fn close_to_single_pane(&mut self, window: WindowId) {
        self.calls.push(Call::CloseToSingle(window));
    }
}

impl ViewportAccessor for FakeHost {
    fn get_scroll_offset(&self, pane: PaneId) -> ScrollOffset {
        self.offsets.get(&pane).copied().unwrap_or_default()
    }

    fn set_scroll_offset(&mut self, pane: PaneId, offset: ScrollOffset) {
        self.offsets.insert(pane, offset);
    }
}

impl StatusReporter for FakeHost {
    fn status_message(&mut self, _window: WindowId, message: &str) {
        self.messages.push(message.to_string());
    }
}

const W1: WindowId = WindowId(1);
const W2: WindowId = WindowId(2);

fn host() -> FakeHost {
    FakeHost::default()
        .with_source(SourceId::buffer("a"), &["a", "b", "c"])
        .with_source(SourceId::buffer("x"), &["a", "x", "c"])
        .with_source(SourceId::buffer("same"), &["a", "b", "c"])
        .with_source(SourceId::buffer("short"), &["a"])
        .with_source(SourceId::buffer("empty"), &[])
        .with_source(SourceId::buffer("xy"), &["x", "y"])
}

#[test]
fn compare_installs_session_and_paints_both_panes() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    let summary = workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    assert_eq!(summary.blocks, 1);
    assert_eq!(summary.rows, 3);
    assert_eq!(host.last_message(), "Compare: 1 difference(s) found.");

    assert_eq!(
        host.take_calls(),
        vec![
            Call::OpenTwoPane(W1),
            Call::Apply(PaneId::left(W1), vec![RowTag::Equal, RowTag::Changed, RowTag::Equal]),
            Call::Apply(PaneId::right(W1), vec![RowTag::Equal, RowTag::Changed, RowTag::Equal]),
            Call::Reveal(PaneId::left(W1), 1),
            Call::Reveal(PaneId::right(W1), 1),
        ]
    );
    let session = workspace.session(W1).unwrap();
    assert_eq!(session.current_block_index(), None);
    assert_eq!(session.blocks(), &[DiffBlock::new(1, 2)]);
}

#[test]
fn delete_and_insert_scenarios() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("short"))
        .unwrap();
    let session = workspace.session(W1).unwrap();
    let left = session.left_pane().unwrap();
    let right = session.right_pane().unwrap();
    assert_eq!(left.tag(1), Some(RowTag::Deleted));
    assert_eq!(left.row(1).unwrap().content, "b");
    assert_eq!(right.tag(1), Some(RowTag::Blank));

    workspace
        .compare(&mut host, W2, SourceId::buffer("empty"), SourceId::buffer("xy"))
        .unwrap();
    let session = workspace.session(W2).unwrap();
    assert_eq!(session.left_pane().unwrap().count(RowTag::Blank), 2);
    assert_eq!(session.right_pane().unwrap().count(RowTag::Added), 2);
    assert_eq!(session.blocks(), &[DiffBlock::new(0, 2)]);
    assert_eq!(workspace.windows(), vec![W1, W2]);
}

#[test]
fn replacing_a_session_tears_down_the_old_one_first() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    host.take_calls();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("short"))
        .unwrap();
    let calls = host.take_calls();
    assert_eq!(
        &calls[..4],
        &[
            Call::Restore(PaneId::left(W1)),
            Call::Restore(PaneId::right(W1)),
            Call::CloseToSingle(W1),
            Call::OpenTwoPane(W1),
        ]
    );
    assert_eq!(workspace.session(W1).unwrap().right_source(), &SourceId::buffer("short"));
}

#[test]
fn failed_compare_leaves_previous_session_untouched() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    workspace.next_diff(&mut host, W1).unwrap();
    host.take_calls();

    let err = workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("missing"))
        .unwrap_err();
    match &err {
        CompareError::ComparisonFailed { source } => {
            assert!(matches!(**source, CompareError::SourceUnavailable { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(host.take_calls().is_empty());
    let session = workspace.session(W1).unwrap();
    assert_eq!(session.right_source(), &SourceId::buffer("x"));
    assert_eq!(session.current_block_index(), Some(0));
}

#[test]
fn navigation_reveals_block_start_and_reports_position() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default().with_reveal_first_diff(false);

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    host.take_calls();

    let pos = workspace.next_diff(&mut host, W1).unwrap();
    assert_eq!(pos.block, DiffBlock::new(1, 2));
    assert_eq!(
        host.take_calls(),
        vec![Call::Reveal(PaneId::left(W1), 1), Call::Reveal(PaneId::right(W1), 1)]
    );
    assert_eq!(host.last_message(), "Compare: difference 1/1");

    let pos = workspace.previous_diff(&mut host, W1).unwrap();
    assert_eq!(pos.index, 0);
}

#[test]
fn navigation_without_blocks_or_session_is_absorbed() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    let err = workspace.next_diff(&mut host, W1).unwrap_err();
    assert!(matches!(err, CompareError::NoActiveSession));
    assert_eq!(host.last_message(), "Compare: no active comparison.");

    let summary = workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("same"))
        .unwrap();
    assert_eq!(summary.blocks, 0);
    host.take_calls();

    let err = workspace.next_diff(&mut host, W1).unwrap_err();
    assert!(matches!(err, CompareError::NoBlocks));
    assert!(err.is_recoverable_navigation());
    assert!(host.take_calls().is_empty());
}

#[test]
fn clear_is_idempotent() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    host.take_calls();

    assert!(workspace.clear(&mut host, W1));
    assert_eq!(
        host.take_calls(),
        vec![
            Call::Restore(PaneId::left(W1)),
            Call::Restore(PaneId::right(W1)),
            Call::CloseToSingle(W1),
        ]
    );
    assert!(!workspace.has_session(W1));

    assert!(!workspace.clear(&mut host, W1));
    assert!(host.take_calls().is_empty());
    assert_eq!(host.last_message(), "Compare: cleared.");
}

#[test]
fn sessions_in_different_windows_are_independent() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    workspace
        .compare(&mut host, W2, SourceId::buffer("empty"), SourceId::buffer("xy"))
        .unwrap();

    workspace.clear(&mut host, W2);
    assert!(workspace.has_session(W1));
    assert!(workspace.next_diff(&mut host, W1).is_ok());
    assert!(workspace.next_diff(&mut host, W2).is_err());
}

#[test]
fn compare_saved_uses_on_disk_counterpart() {
    let path = std::env::temp_dir().join(format!("pairdiff-saved-{}.txt", std::process::id()));
    std::fs::write(&path, "a\nb\nc\n").unwrap();

    let mut host = host();
    host.saved.insert(SourceId::buffer("x"), path.clone());
    host.sources.insert(
        SourceId::File(path.clone()),
        pairdiff_core::host::read_file_lines(&path).unwrap(),
    );
    std::fs::remove_file(&path).ok();

    let mut workspace = CompareWorkspace::default();
    workspace
        .compare_saved(&mut host, W1, SourceId::buffer("x"))
        .unwrap();
    let session = workspace.session(W1).unwrap();
    assert_eq!(session.left_source(), &SourceId::buffer("x"));
    assert_eq!(session.right_source(), &SourceId::File(path));
    assert_eq!(session.right_pane().unwrap().row(1).unwrap().content, "b");

    let err = workspace
        .compare_saved(&mut host, W2, SourceId::buffer("a"))
        .unwrap_err();
    assert!(matches!(err.root_cause(), CompareError::SourceUnavailable { .. }));
    assert!(!workspace.has_session(W2));
}

#[test]
fn scroll_is_mirrored_and_echo_suppressed() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();

    assert!(matches!(
        workspace.on_scroll(&mut host, PaneId::left(W1), ScrollOffset::at_row(1)),
        Err(CompareError::NoActiveSession)
    ));

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();

    let action = workspace
        .on_scroll(&mut host, PaneId::left(W1), ScrollOffset::new(2, 4))
        .unwrap()
        .unwrap();
    assert_eq!(action.target, PaneId::right(W1));
    assert_eq!(host.get_scroll_offset(PaneId::right(W1)), ScrollOffset::new(2, 4));

    let echo = workspace
        .on_scroll(&mut host, PaneId::right(W1), ScrollOffset::new(2, 4))
        .unwrap();
    assert!(echo.is_none());

    workspace.set_sync_enabled(false);
    let off = workspace
        .on_scroll(&mut host, PaneId::right(W1), ScrollOffset::at_row(0))
        .unwrap();
    assert!(off.is_none());
    assert_eq!(host.get_scroll_offset(PaneId::left(W1)), ScrollOffset::default());
}

#[test]
fn close_window_drops_session_without_layout_calls() {
    let mut host = host();
    let mut workspace = CompareWorkspace::default();
    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    host.take_calls();

    assert!(workspace.close_window(W1));
    assert!(!workspace.close_window(W1));
    assert!(host.take_calls().is_empty());

    workspace
        .compare(&mut host, W1, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    workspace
        .compare(&mut host, W2, SourceId::buffer("a"), SourceId::buffer("x"))
        .unwrap();
    host.take_calls();
    workspace.clear_all(&mut host);
    assert!(workspace.windows().is_empty());
    assert_eq!(
        host.take_calls()
            .iter()
            .filter(|call| matches!(call, Call::CloseToSingle(_)))
            .count(),
        2
    );
}
