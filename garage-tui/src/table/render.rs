//! ratatui rendering of a [`TableView`].

use super::state::SortDirection;
use super::view::{FieldKind, HeaderCheck, TableView};
use crate::theme::{status_color, Theme};
use garage_core::Resource;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState as RatatuiTableState},
    Frame,
};

const STATUS_COLUMN: &str = "status";

pub fn checkbox(check: HeaderCheck) -> &'static str {
    match check {
        HeaderCheck::Checked => "[x]",
        HeaderCheck::Indeterminate => "[-]",
        HeaderCheck::Unchecked => "[ ]",
    }
}

/// Footer text: page position and selection count.
pub fn footer_text<R: Resource>(view: &TableView<R>) -> String {
    format!(
        "Page {} of {} · {} of {} row(s) selected",
        view.state().page + 1,
        view.page_count(),
        view.state().selected_ids.len(),
        view.filtered_rows().len()
    )
}

/// Toolbar labels for the configured bulk actions.
pub fn toolbar_labels<R: Resource>(view: &TableView<R>) -> Vec<&'static str> {
    let config = view.config();
    let mut labels = Vec::new();
    if config.add_form.is_some() {
        labels.push("[n] Add");
    }
    if config.on_export_selected.is_some() {
        labels.push("[e] Export selected");
    }
    if config.on_export_all.is_some() {
        labels.push("[E] Export all");
    }
    if config.on_delete_selected.is_some() {
        labels.push("[d] Delete selected");
    }
    labels
}

pub fn render_table<R: Resource>(
    f: &mut Frame<'_>,
    area: Rect,
    view: &TableView<R>,
    theme: &Theme,
    title: &str,
) {
    let config = view.config();
    let has_filter = config.filter_column_id.is_some();

    let mut constraints = Vec::new();
    if has_filter {
        constraints.push(Constraint::Length(3));
    }
    if config.show_action_buttons {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;

    if has_filter {
        render_filter(f, chunks[next], view, theme);
        next += 1;
    }
    if config.show_action_buttons {
        let spans: Vec<Span> = toolbar_labels(view)
            .into_iter()
            .map(|label| Span::styled(format!("{}  ", label), Style::default().fg(theme.secondary)))
            .collect();
        f.render_widget(Paragraph::new(Line::from(spans)), chunks[next]);
        next += 1;
    }

    render_rows(f, chunks[next], view, theme, title);
    next += 1;

    let footer = Paragraph::new(footer_text(view)).style(Style::default().fg(theme.text_dim));
    f.render_widget(footer, chunks[next]);

    if view.state().add_form_open {
        render_add_form(f, area, view, theme);
    }
}

fn render_filter<R: Resource>(f: &mut Frame<'_>, area: Rect, view: &TableView<R>, theme: &Theme) {
    let state = view.state();
    let (text, style) = if state.filter_text.is_empty() && !state.filter_focused {
        (
            view.config().filter_placeholder.clone(),
            Style::default().fg(theme.text_dim),
        )
    } else {
        let cursor = if state.filter_focused { "_" } else { "" };
        (
            format!("{}{}", state.filter_text, cursor),
            Style::default().fg(theme.text),
        )
    };
    let border = if state.filter_focused {
        theme.border_focus
    } else {
        theme.border
    };
    let paragraph = Paragraph::new(text).style(style).block(
        Block::default()
            .title("Filter [/]")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_rows<R: Resource>(
    f: &mut Frame<'_>,
    area: Rect,
    view: &TableView<R>,
    theme: &Theme,
    title: &str,
) {
    let state = view.state();
    let columns = view.visible_columns();
    let focused_id = view.focused_column().map(|c| c.id);
    let show_actions = view.config().show_actions_column;

    let mut header_cells = vec![Cell::from(checkbox(view.header_check()))];
    for column in &columns {
        let indicator = match &state.sort {
            Some(sort) if sort.column_id == column.id => match sort.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        };
        let mut style = Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD);
        if focused_id == Some(column.id) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        header_cells.push(Cell::from(Span::styled(
            format!("{}{}", column.header, indicator),
            style,
        )));
    }
    if show_actions {
        header_cells.push(Cell::from(Span::styled(
            "Actions",
            Style::default().fg(theme.primary),
        )));
    }

    let page_rows = view.page_rows();
    let rows: Vec<Row> = page_rows
        .iter()
        .map(|record| {
            let mark = if view.is_selected(record) { "[x]" } else { "[ ]" };
            let mut cells = vec![Cell::from(mark)];
            for column in &columns {
                let text = column.render(record);
                let style = if column.id == STATUS_COLUMN {
                    Style::default().fg(status_color(&text, theme))
                } else {
                    Style::default().fg(theme.text)
                };
                cells.push(Cell::from(Span::styled(text, style)));
            }
            if show_actions {
                cells.push(Cell::from(Span::styled(
                    "[x] del",
                    Style::default().fg(theme.error),
                )));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(columns.iter().map(|c| Constraint::Min(c.min_width)));
    if show_actions {
        widths.push(Constraint::Length(8));
    }

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    if page_rows.is_empty() {
        let paragraph = Paragraph::new("No results.")
            .style(Style::default().fg(theme.text_dim))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells).bottom_margin(1))
        .block(block)
        .highlight_style(Style::default().bg(theme.bg_highlight))
        .highlight_symbol("> ");

    let mut table_state = RatatuiTableState::default();
    table_state.select(Some(state.cursor));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_add_form<R: Resource>(f: &mut Frame<'_>, area: Rect, view: &TableView<R>, theme: &Theme) {
    let Some(form) = view.add_form() else {
        return;
    };
    let state = &view.state().form;
    let height = (form.fields.len() as u16) * 2 + 6;
    let popup = centered_rect(60, height, area);

    let mut lines = Vec::new();
    for (index, field) in form.fields.iter().enumerate() {
        let raw = state.values.get(index).cloned().unwrap_or_default();
        let value = if field.kind == FieldKind::Password {
            "*".repeat(raw.chars().count())
        } else {
            raw
        };
        let focused = index == state.focus;
        let label_style = if focused {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        let marker = if field.required { " *" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{}{}", field.label, marker),
            label_style,
        )));
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("  {}{}", value, cursor),
            Style::default().fg(theme.text),
        )));
    }
    lines.push(Line::from(""));
    if state.submitting {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(theme.info),
        )));
    } else if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter submit · Tab next field · Esc cancel",
            Style::default().fg(theme.text_dim),
        )));
    }

    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(form.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focus)),
    );
    f.render_widget(paragraph, popup);
}

/// Rectangle of `percent_x` width and fixed height centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width = area.width * percent_x.min(100) / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
