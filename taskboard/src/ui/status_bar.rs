//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{DrawContext, theme};
use crate::app::{App, PanelFocus};

/// Render the status bar: source, newest toast, key help.
pub fn render(frame: &mut Frame, area: Rect, app: &App, ctx: &DrawContext<'_>) {
    let help_text = if app.add_open {
        "Enter: add | Esc: close"
    } else {
        match app.focus {
            PanelFocus::Search => "Type to filter | Enter: tasks | Tab: switch | Esc: quit",
            PanelFocus::Tasks => {
                "a: add | p/i/c: set status | ←→: cycle | r: refresh | /: search | q: quit"
            }
        }
    };

    let mut spans = vec![
        Span::styled("Taskboard", theme::bold()),
        Span::raw(" | "),
        Span::styled(ctx.source, theme::dimmed()),
        Span::raw(" | "),
    ];

    if let Some(toast) = app.toasts.latest(ctx.now) {
        let color = theme::toast_color(toast.level);
        spans.push(Span::styled(toast.title, theme::panel_title(color)));
        if let Some(description) = toast.description {
            spans.push(Span::styled(format!(": {description}"), theme::normal().fg(color)));
        }
        spans.push(Span::raw(" | "));
    }

    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
