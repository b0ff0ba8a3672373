//! Count tiles across the top of the dashboard.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use taskboard_proto::task::TaskStatus;

use super::theme;
use crate::app::App;

/// Render the Total / Pending / In progress / Complete tiles.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let counts = app.counts();
    let tiles = [
        ("Total", counts.total, theme::FG_PRIMARY),
        (
            TaskStatus::Pending.label(),
            counts.pending,
            theme::status_color(TaskStatus::Pending),
        ),
        (
            TaskStatus::InProgress.label(),
            counts.in_progress,
            theme::status_color(TaskStatus::InProgress),
        ),
        (
            TaskStatus::Complete.label(),
            counts.complete,
            theme::status_color(TaskStatus::Complete),
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), column) in tiles.into_iter().zip(columns.iter()) {
        render_tile(frame, *column, label, value, color);
    }
}

fn render_tile(frame: &mut Frame, area: Rect, label: &str, value: usize, color: Color) {
    let line = Line::from(vec![
        Span::styled(format!("{label}: "), theme::dimmed()),
        Span::styled(value.to_string(), theme::panel_title(color)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dimmed());
    frame.render_widget(Paragraph::new(line).centered().block(block), area);
}
