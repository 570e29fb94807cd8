//! Split view: two line-aligned panes

use super::{display_text, fill_pattern};
use crate::app::{App, WINDOW};
use pairdiff_core::blocks::block_at;
use pairdiff_core::{RowTag, Side};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Marker + "1234 "
const GUTTER_WIDTH: u16 = 6;
const BLOCK_MARKER: &str = "▌";
const EXTENT_MARKER: &str = "▏";

/// Render the split view
pub fn render_split(frame: &mut Frame, app: &mut App, area: Rect) {
    // one row for the pane headers
    app.host
        .set_viewport_height(area.height.saturating_sub(1) as usize);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_pane(frame, app, Side::Left, chunks[0]);
    render_pane(frame, app, Side::Right, chunks[1]);
}

fn render_pane(frame: &mut Frame, app: &App, side: Side, area: Rect) {
    let rows = app.host.pane(side).rows.as_ref();
    let offset = app.host.pane(side).offset;
    let blocks = app
        .workspace
        .session(WINDOW)
        .map(|session| session.blocks())
        .unwrap_or_default();
    let current_block = app.current_block();
    let (left_source, right_source) = app.sources();
    let source = match side {
        Side::Left => left_source,
        Side::Right => right_source,
    };

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let header_area = outer[0];

    let gutter_width = if app.line_numbers { GUTTER_WIDTH } else { 1 };
    let border_width = if side == Side::Left { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(gutter_width),
            Constraint::Min(0),
            Constraint::Length(border_width),
        ])
        .split(outer[1]);
    let gutter_area = chunks[0];
    let content_area = chunks[1];
    let border_area = chunks[2];

    let header_style = if app.focus == side {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", source.label()), header_style))),
        header_area,
    );

    let visible_height = content_area.height as usize;
    // padded past the horizontal scroll so backgrounds reach the pane edge
    let fill_width = content_area.width as usize + offset.column;

    let mut gutter_lines: Vec<Line> = Vec::new();
    let mut content_lines: Vec<Line> = Vec::new();

    if let Some(rows) = rows {
        for (index, row) in rows.iter().enumerate().skip(offset.row).take(visible_height) {
            let marker = if current_block.is_some_and(|block| block.contains(index)) {
                Span::styled(BLOCK_MARKER, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else if block_at(blocks, index).is_some() {
                Span::styled(EXTENT_MARKER, Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(" ")
            };
            let mut gutter_spans = vec![marker];
            if app.line_numbers {
                let number = row
                    .line_number
                    .map(|n| format!("{:4} ", n))
                    .unwrap_or_else(|| "     ".to_string());
                gutter_spans.push(Span::styled(number, Style::default().fg(Color::DarkGray)));
            }
            gutter_lines.push(Line::from(gutter_spans));

            let style = app.palette.style(row.tag);
            let text = if row.tag == RowTag::Blank {
                fill_pattern(&app.blank_fill, fill_width)
            } else if row.tag.is_equal() {
                row.content.replace('\t', "    ")
            } else {
                display_text(&row.content, fill_width)
            };
            content_lines.push(Line::from(Span::styled(text, style)));
        }
    }

    frame.render_widget(Paragraph::new(gutter_lines), gutter_area);
    frame.render_widget(
        Paragraph::new(content_lines).scroll((0, offset.column as u16)),
        content_area,
    );

    if border_width > 0 {
        let border = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(border, border_area);
    }
}
