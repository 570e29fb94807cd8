//! UI rendering for the TUI

use crate::app::App;
use crate::views::{render_single, render_split};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    if app.zen_mode {
        draw_content(frame, app, frame.area());
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        draw_content(frame, app, chunks[0]);
        draw_status_bar(frame, app, chunks[1]);
    }

    if app.show_help {
        draw_help_popover(frame, app);
    }
}

fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.host.is_two_pane() {
        render_split(frame, app, area);
    } else {
        render_single(frame, app, area);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    let muted = Style::default().fg(Color::DarkGray);
    let mode = if app.host.is_two_pane() { " SPLIT " } else { " SINGLE " };

    let mut left = vec![Span::styled(
        mode,
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(counter) = app.block_counter() {
        left.push(Span::raw(" "));
        left.push(Span::styled(counter, Style::default().add_modifier(Modifier::BOLD)));
    }
    if let Some(session) = app.workspace.session(crate::app::WINDOW) {
        let stats = session.stats();
        left.push(Span::raw(" "));
        left.push(Span::styled(format!("+{}", stats.insertions), Style::default().fg(Color::Green)));
        left.push(Span::raw(" "));
        left.push(Span::styled(format!("-{}", stats.deletions), Style::default().fg(Color::Red)));
    }
    if let Some(message) = app.host.status() {
        left.push(Span::styled(format!("  {}", message), muted));
    }

    let sync = if app.workspace.sync_enabled() { "sync" } else { "nosync" };
    let right = format!("{} · {} · ? help ", sync, app.workspace.engine().algorithm().name());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(left)), chunks[0]);
    frame.render_widget(Paragraph::new(Span::styled(right, muted)), chunks[1]);
}

fn draw_help_popover(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let popup_width = 44u16.min(area.width.saturating_sub(4));
    let popup_height = 20u16.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(Color::Cyan);
    let label_style = Style::default();
    let section_style = Style::default().fg(Color::Yellow);

    let help_line = |key: &str, desc: String| -> Line {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::styled(desc, label_style),
        ])
    };

    let sync = if app.workspace.sync_enabled() { "on" } else { "off" };
    let lines = vec![
        Line::from(Span::styled(" Scrolling", section_style)),
        help_line("j / k / ↑↓", "Scroll down/up".into()),
        help_line("^D / ^U", "Scroll half-page".into()),
        help_line("h / l / ←→", "Scroll left/right".into()),
        help_line("g / G", "Go to start/end".into()),
        help_line("Tab", "Switch focused pane".into()),
        help_line("s", format!("Toggle scroll sync ({})", sync)),
        Line::from(""),
        Line::from(Span::styled(" Differences", section_style)),
        help_line("n / Alt-↓", "Next difference".into()),
        help_line("N / p / Alt-↑", "Previous difference".into()),
        help_line("c", "Clear comparison".into()),
        help_line("r", "Re-read and compare".into()),
        Line::from(""),
        Line::from(Span::styled(" View", section_style)),
        help_line("Z", "Zen mode".into()),
        help_line("?", "Close help".into()),
        help_line("q / Esc", "Quit".into()),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));

    let help_block = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(help_block, popup_area);
}
