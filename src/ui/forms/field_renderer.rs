//! Field rendering utilities for forms

use crate::state::{FieldKind, FieldName, FormState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field needs, borders included
pub fn field_height(field: FieldName) -> u16 {
    match field.kind() {
        FieldKind::MultilineText => 6,
        _ => 3,
    }
}

/// Draw one intake field from the form state
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    form: &FormState,
    field: FieldName,
    is_active: bool,
    is_required: bool,
) {
    let accent = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value = form.display_value(field);
    let kind = field.kind();
    let placeholder = match kind {
        FieldKind::Choice => "(choose with ← →)",
        FieldKind::Date => "(pick a day with ← →)",
        FieldKind::Time => "(pick a time with ← →)",
        FieldKind::Text | FieldKind::MultilineText => "(empty)",
    };

    let content = match kind {
        FieldKind::Text | FieldKind::MultilineText => {
            let mut lines: Vec<Line> = value.lines().map(|l| Line::from(l.to_string())).collect();
            if value.ends_with('\n') || lines.is_empty() {
                lines.push(Line::from(""));
            }
            if is_active {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(Span::styled("▌", accent));
                }
            } else if value.is_empty() {
                lines = vec![Line::from(Span::styled(placeholder, accent))];
            }
            Paragraph::new(lines)
        }
        FieldKind::Choice | FieldKind::Date | FieldKind::Time => {
            let shown = if value.is_empty() {
                Span::styled(placeholder, Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(value)
            };
            let mut spans = vec![shown];
            if is_active {
                spans.insert(0, Span::styled("◀ ", accent));
                spans.push(Span::styled(" ▶", accent));
            }
            Paragraph::new(Line::from(spans))
        }
    };

    let marker = if is_required { " *" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", field.label(), marker))
        .borders(Borders::ALL)
        .border_style(accent);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
