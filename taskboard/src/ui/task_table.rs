//! Task table rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use taskboard_proto::task::Task;

use super::{DrawContext, format_due, theme};
use crate::app::{App, PanelFocus};

/// Render the filtered task list, or the loading / empty placeholder.
pub fn render(frame: &mut Frame, area: Rect, app: &App, ctx: &DrawContext<'_>) {
    let focused = app.focus == PanelFocus::Tasks && !app.add_open;
    let block = Block::default()
        .title(Span::styled("Tasks", theme::panel_title(theme::SUCCESS)))
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    if app.list.loading_indicator_visible() {
        let text = Paragraph::new(Span::styled("Loading tasks…", theme::dimmed())).block(block);
        frame.render_widget(text, area);
        return;
    }
    if let Some(message) = app.list.empty_message(Some(&app.query)) {
        let text = Paragraph::new(Span::styled(message, theme::dimmed()))
            .centered()
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let rows: Vec<Row> = app
        .visible_tasks()
        .into_iter()
        .map(|task| task_row(task, ctx))
        .collect();

    let header = Row::new(["Title", "Due", "Status"]).style(theme::bold());
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(if focused {
        theme::selected()
    } else {
        theme::highlighted()
    });

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn task_row<'a>(task: &'a Task, ctx: &DrawContext<'_>) -> Row<'a> {
    let overdue = task.is_overdue(ctx.today);

    let mut title = vec![Span::styled(task.title.as_str(), theme::bold())];
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        title.push(Span::raw("  "));
        title.push(Span::styled(description, theme::dimmed()));
    }

    let due = match task.due_date {
        Some(due) => {
            let text = format_due(due.date_naive(), ctx.date_format);
            let style = if overdue {
                theme::error_text()
            } else {
                theme::dimmed()
            };
            let mut spans = vec![Span::styled(text, style)];
            if overdue {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(" Overdue ", theme::overdue_badge()));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled("\u{2014}", theme::dimmed())),
    };

    let color = theme::status_color(task.status);
    let status = Line::from(vec![
        Span::styled(theme::status_symbol(task.status), theme::normal().fg(color)),
        Span::raw(" "),
        Span::styled(task.status.label(), theme::normal().fg(color)),
    ]);

    Row::new(vec![Line::from(title), due, status])
}
