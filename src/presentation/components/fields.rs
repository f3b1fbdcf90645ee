use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::form::{FieldState, FieldValue};

use super::super::view::UiContext;

pub fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    ctx: &UiContext<'_>,
    enable_cursor: bool,
) {
    let form = ctx.form;
    let content_width = area.width.saturating_sub(4);
    let mut items = Vec::with_capacity(form.fields.len());
    let mut cursor_hint: Option<CursorHint> = None;
    let mut line_offset = 0usize;

    for (idx, field) in form.fields.iter().enumerate() {
        let render = build_field_render(field, idx == form.field_index, content_width);
        let line_count = render.lines.len();
        if cursor_hint.is_none() {
            if let Some(mut hint) = render.cursor_hint {
                hint.line_offset += line_offset;
                cursor_hint = Some(hint);
            }
        }
        line_offset += line_count;
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(Some(form.field_index));

    let list = List::new(items)
        .block(
            Block::default()
                .title(ctx.title.to_string())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);

    if enable_cursor {
        if let Some(cursor) = cursor_hint {
            let inner_y = area.y.saturating_add(1);
            let inner_x = area.x.saturating_add(1);
            let line = cursor
                .line_offset
                .min(area.height.saturating_sub(2) as usize) as u16;
            let cursor_y = inner_y.saturating_add(line);
            let cursor_x = inner_x.saturating_add(4).saturating_add(cursor.value_width);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

struct FieldRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

struct CursorHint {
    line_offset: usize,
    value_width: u16,
}

fn build_field_render(field: &FieldState, is_selected: bool, max_width: u16) -> FieldRender {
    let mut lines = Vec::new();
    let mut label = field.schema.display_label();
    if field.schema.required {
        label.push_str(" *");
    }

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    let (value_panel, cursor_hint) = match &field.value {
        FieldValue::Toggle(flag) => (checkbox_lines(*flag), None),
        _ => value_panel_lines(field, is_selected, max_width),
    };
    lines.extend(value_panel);

    if let Some(hint) = affordance_line(field) {
        lines.push(hint);
    }

    if let Some(error) = error_lines(field, max_width) {
        lines.extend(error);
    }

    FieldRender { lines, cursor_hint }
}

fn value_panel_lines(
    field: &FieldState,
    is_selected: bool,
    max_width: u16,
) -> (Vec<Line<'static>>, Option<CursorHint>) {
    let clamp_width = max_width.max(4) as usize;
    let value_text = field.display_value();
    let mut wrapped_value: Vec<String> = wrap(&value_text, clamp_width)
        .into_iter()
        .map(|segment| segment.into_owned())
        .collect();
    if wrapped_value.is_empty() {
        wrapped_value.push(String::new());
    }
    let inner_width = wrapped_value
        .iter()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .max()
        .unwrap_or(0);
    let last_line_width = wrapped_value
        .last()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .unwrap_or(0);
    let mut cursor_hint = None;
    let mut lines = Vec::new();

    if is_selected {
        let border_width = inner_width.saturating_add(2);
        let border_line = "─".repeat(border_width);
        let border_style = Style::default().fg(Color::Yellow);
        let value_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        lines.push(Line::from(Span::styled(
            format!("┌{}┐", border_line),
            border_style,
        )));
        let value_line_index = lines.len();
        for segment in &wrapped_value {
            let mut content = segment.clone();
            let mut width = UnicodeWidthStr::width(content.as_str());
            while width < inner_width {
                content.push(' ');
                width += 1;
            }
            lines.push(Line::from(vec![
                Span::styled("│ ", border_style),
                Span::styled(content, value_style),
                Span::styled(" │", border_style),
            ]));
        }
        lines.push(Line::from(Span::styled(
            format!("└{}┘", border_line),
            border_style,
        )));
        let editable = matches!(field.value, FieldValue::Text(_));
        if editable {
            cursor_hint = Some(CursorHint {
                line_offset: value_line_index,
                value_width: last_line_width as u16,
            });
        }
    } else {
        for segment in wrapped_value {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(segment, Style::default().fg(Color::White)),
            ]));
        }
    }

    (lines, cursor_hint)
}

fn checkbox_lines(checked: bool) -> Vec<Line<'static>> {
    let mark = if checked { "[x]" } else { "[ ]" };
    vec![Line::from(vec![
        Span::raw("  "),
        Span::styled(
            mark.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Space toggles", Style::default().fg(Color::DarkGray)),
    ])]
}

fn affordance_line(field: &FieldState) -> Option<Line<'static>> {
    if matches!(field.value, FieldValue::Choice(_)) {
        return Some(Line::from(Span::styled(
            "  [+] Enter opens the role list",
            Style::default().fg(Color::DarkGray),
        )));
    }
    None
}

fn error_lines(field: &FieldState, max_width: u16) -> Option<Vec<Line<'static>>> {
    field.error.as_ref().map(|message| {
        let mut lines = Vec::new();
        lines.push(Line::from(Span::styled(
            "  Error:",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        for line in wrap(message, max_width.max(4) as usize) {
            lines.push(Line::from(Span::styled(
                format!("    {}", line.into_owned()),
                Style::default().fg(Color::Red),
            )));
        }
        lines
    })
}
