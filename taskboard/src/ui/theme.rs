//! Colors and styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use taskboard_proto::task::TaskStatus;

use crate::notify::ToastLevel;

/// Default text color.
pub const FG_PRIMARY: Color = Color::White;

/// Focus and accent color.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Completed work and confirmations.
pub const SUCCESS: Color = Color::Green;

const MUTED: Color = Color::Gray;
const DANGER: Color = Color::Red;
const BAR_BG: Color = Color::Rgb(30, 30, 50);
const BADGE_BG: Color = Color::Rgb(60, 20, 20);

/// Accent for each status: stats tiles, table cells and the form selector.
#[must_use]
pub const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Complete => SUCCESS,
    }
}

/// Glyph drawn before the status label.
#[must_use]
pub const fn status_symbol(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "\u{25cb}",
        TaskStatus::InProgress => "\u{25d0}",
        TaskStatus::Complete => "\u{2713}",
    }
}

#[must_use]
pub const fn toast_color(level: ToastLevel) -> Color {
    match level {
        ToastLevel::Loading => HIGHLIGHT,
        ToastLevel::Success => SUCCESS,
        ToastLevel::Error => DANGER,
    }
}

#[must_use]
pub fn normal() -> Style {
    Style::new().fg(FG_PRIMARY)
}

#[must_use]
pub fn dimmed() -> Style {
    Style::new().fg(MUTED)
}

#[must_use]
pub fn bold() -> Style {
    normal().add_modifier(Modifier::BOLD)
}

/// Accent text, also used for focused borders.
#[must_use]
pub fn highlighted() -> Style {
    panel_title(HIGHLIGHT)
}

/// The selected table row.
#[must_use]
pub fn selected() -> Style {
    Style::new()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

#[must_use]
pub fn border(focused: bool) -> Style {
    if focused { highlighted() } else { normal() }
}

/// Red "OVERDUE" chip in the due column.
#[must_use]
pub fn overdue_badge() -> Style {
    panel_title(DANGER).bg(BADGE_BG)
}

#[must_use]
pub fn error_text() -> Style {
    Style::new().fg(DANGER)
}

#[must_use]
pub fn status_bar_bg() -> Style {
    Style::new().fg(FG_PRIMARY).bg(BAR_BG)
}

/// Bold text in `color`.
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::new().fg(color).add_modifier(Modifier::BOLD)
}
