//! Non-interactive output: aligned panes as plain text or JSON

use crate::views::fill_pattern;
use pairdiff_core::{AlignedPane, AlignedRow, CompareSummary, ComparisonSession, DiffBlock, RowTag};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Gutter marker per tag
fn tag_marker(tag: RowTag) -> char {
    match tag {
        RowTag::Equal => ' ',
        RowTag::Added => '+',
        RowTag::Deleted => '-',
        RowTag::Changed => '~',
        RowTag::Blank => ' ',
    }
}

/// Cut or pad `text` to exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let text = text.replace('\t', "    ");
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn cell(row: &AlignedRow, width: usize, blank_fill: &str) -> String {
    let number = row
        .line_number
        .map(|n| format!("{:4}", n))
        .unwrap_or_else(|| "    ".to_string());
    let body = if row.is_blank() {
        fill_pattern(blank_fill, width)
    } else {
        fit(&row.content, width)
    };
    format!("{} {} {}", number, tag_marker(row.tag), body)
}

/// Render both panes side by side, `width` columns in total
pub fn render_plain(session: &ComparisonSession, width: usize, blank_fill: &str) -> String {
    let (Some(left), Some(right)) = (session.left_pane(), session.right_pane()) else {
        return String::new();
    };
    // "1234 + " on each side and " | " between them
    let column = width.saturating_sub(2 * 7 + 3).max(8) / 2;

    let mut out = String::new();
    out.push_str(&fit(&session.left_source().to_string(), column + 7));
    out.push_str(" | ");
    out.push_str(session.right_source().to_string().as_str());
    out.push('\n');

    for (l, r) in left.iter().zip(right.iter()) {
        let line = format!("{} | {}", cell(l, column, blank_fill), cell(r, column, blank_fill));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    left_source: String,
    right_source: String,
    left: &'a AlignedPane,
    right: &'a AlignedPane,
    blocks: &'a [DiffBlock],
}

/// `{left, right, blocks}` with stable tag identifiers
pub fn render_json(session: &ComparisonSession) -> serde_json::Result<String> {
    let empty = AlignedPane::default();
    let report = JsonReport {
        left_source: session.left_source().to_string(),
        right_source: session.right_source().to_string(),
        left: session.left_pane().unwrap_or(&empty),
        right: session.right_pane().unwrap_or(&empty),
        blocks: session.blocks(),
    };
    serde_json::to_string_pretty(&report)
}

/// Widest line of either pane, for sizing plain output to the content
pub fn content_width(session: &ComparisonSession) -> usize {
    session
        .left_pane()
        .into_iter()
        .chain(session.right_pane())
        .flat_map(|pane| pane.iter())
        .map(|row| row.content.width())
        .max()
        .unwrap_or(0)
}

/// Process status in the diff(1) convention: 0 identical, 1 different, 2 trouble
pub fn exit_status<E>(result: &Result<CompareSummary, E>) -> u8 {
    match result {
        Ok(summary) if summary.blocks == 0 => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}
