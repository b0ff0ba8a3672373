//! Add-task dialog rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use taskboard_proto::task::TaskStatus;

use super::theme;
use crate::app::App;
use crate::tasks::FormField;

/// Render the add-task dialog over `area`.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let fields = app.form.fields();
    let mut lines = Vec::new();

    for (field, value, hint) in [
        (FormField::Title, fields.title.as_str(), "Write a clear, concise task title"),
        (FormField::Description, fields.description.as_str(), "Optional details"),
        (FormField::DueDate, fields.due_date.as_str(), "YYYY-MM-DD"),
    ] {
        lines.push(text_line(field, value, hint, app.form_field == field));
    }
    lines.push(status_line(fields.status, app.form_field == FormField::Status));
    lines.push(Line::raw(""));

    if app.form.is_loading() {
        lines.push(Line::from(Span::styled("Saving…", theme::highlighted())));
    } else if let Some(error) = app.form.error() {
        lines.push(Line::from(Span::styled(error, theme::error_text())));
    } else if let Some(message) = app.form.success_message() {
        lines.push(Line::from(Span::styled(
            message,
            theme::normal().fg(theme::SUCCESS),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Enter: add task | Tab/↑↓: field | ←→: status | Esc: close",
        theme::dimmed(),
    )));

    let block = Block::default()
        .title(Span::styled("New task", theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn label(field: FormField, focused: bool) -> Span<'static> {
    let style = if focused {
        theme::highlighted()
    } else {
        theme::dimmed()
    };
    Span::styled(format!("{:<12}", field.label()), style)
}

fn text_line<'a>(field: FormField, value: &'a str, hint: &'a str, focused: bool) -> Line<'a> {
    let mut spans = vec![label(field, focused)];
    if value.is_empty() && !focused {
        spans.push(Span::styled(hint, theme::dimmed()));
    } else {
        spans.push(Span::styled(value, theme::normal()));
    }
    if focused {
        spans.push(Span::styled("\u{2588}", theme::highlighted()));
    }
    Line::from(spans)
}

fn status_line(current: TaskStatus, focused: bool) -> Line<'static> {
    let mut spans = vec![label(FormField::Status, focused)];
    for status in TaskStatus::ALL {
        let style = if status == current {
            theme::panel_title(theme::status_color(status))
        } else {
            theme::dimmed()
        };
        let text = if status == current {
            format!("[{}]", status.label())
        } else {
            format!(" {} ", status.label())
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}
