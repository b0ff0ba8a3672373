//! Terminal UI rendering.

pub mod form_panel;
pub mod stats;
pub mod status_bar;
pub mod task_table;
pub mod theme;

use std::fmt::Write as _;
use std::time::Instant;

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, PanelFocus};

/// Per-frame values the renderer needs besides the app state.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Local calendar day, for the overdue badge.
    pub today: NaiveDate,
    /// Frame time, for toast expiry.
    pub now: Instant,
    /// Due date display format.
    pub date_format: &'a str,
    /// Where tasks come from (shown in the status bar).
    pub source: &'a str,
}

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App, ctx: &DrawContext<'_>) {
    let error_height = u16::from(app.list.error().is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Stats
            Constraint::Length(3),            // Search
            Constraint::Length(error_height), // Inline list error
            Constraint::Min(3),               // Tasks
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    stats::render(frame, chunks[0], app);
    render_search(frame, chunks[1], app);
    if let Some(error) = app.list.error() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(error, theme::error_text()))),
            chunks[2],
        );
    }
    task_table::render(frame, chunks[3], app, ctx);
    status_bar::render(frame, chunks[4], app, ctx);

    if app.add_open {
        form_panel::render(frame, centered(frame.area(), 60, 14), app);
    }
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == PanelFocus::Search && !app.add_open;
    let text = if app.query.is_empty() && !focused {
        Line::from(Span::styled(
            "Search tasks by title or description…",
            theme::dimmed(),
        ))
    } else {
        Line::from(vec![
            Span::styled(app.query.as_str(), theme::normal()),
            Span::styled(if focused { "\u{2588}" } else { "" }, theme::highlighted()),
        ])
    };
    let block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(theme::border(focused));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// A `width` x `height` rect centered in `area`, clipped to fit.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Formats a due date with a user-supplied chrono format, falling back to
/// ISO dates when the format string is invalid.
#[must_use]
pub fn format_due(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format("%Y-%m-%d"));
    }
    out
}
