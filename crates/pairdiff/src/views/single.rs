//! Single pane showing the right source after a comparison is cleared

use crate::app::App;
use pairdiff_core::Side;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_single(frame: &mut Frame, app: &mut App, area: Rect) {
    app.host
        .set_viewport_height(area.height.saturating_sub(1) as usize);
    let (_, source) = app.sources();
    let offset = app.host.pane(Side::Right).offset;

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let gutter_width = if app.line_numbers { 5 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter_width), Constraint::Min(0)])
        .split(outer[1]);

    let header = Line::from(vec![
        Span::styled(
            format!(" {}", source.label()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (no comparison, r to compare)", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), outer[0]);

    let visible_height = chunks[1].height as usize;
    let lines = app.host.loaded(&source).unwrap_or_default();

    let gutter_lines: Vec<Line> = (offset.row..lines.len())
        .take(visible_height)
        .map(|index| Line::from(Span::styled(format!("{:4} ", index + 1), Style::default().fg(Color::DarkGray))))
        .collect();
    let content_lines: Vec<Line> = lines
        .iter()
        .skip(offset.row)
        .take(visible_height)
        .map(|line| Line::from(line.replace('\t', "    ")))
        .collect();

    if app.line_numbers {
        frame.render_widget(Paragraph::new(gutter_lines), chunks[0]);
    }
    frame.render_widget(
        Paragraph::new(content_lines).scroll((0, offset.column as u16)),
        chunks[1],
    );
}
