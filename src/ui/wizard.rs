//! Input steps of the wizard

use super::forms::{draw_field, field_height};
use crate::app::App;
use crate::state::{format_size, FocusTarget, Step, MAX_ATTACHMENTS, MAX_FILE_SIZE};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let step = state.current_step();
    let focused = state.focused();

    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = step.fields();
    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|f| Constraint::Length(field_height(*f)))
        .collect();
    let has_files = step == Step::ContactAndFiles;
    if has_files {
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Min(3));
    } else {
        constraints.push(Constraint::Min(0));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in fields.iter().enumerate() {
        draw_field(
            frame,
            chunks[i],
            state.intake.form(),
            *field,
            focused == Some(FocusTarget::Field(*field)),
            step.is_required(*field),
        );
    }

    if has_files {
        let n = fields.len();
        draw_attach_input(frame, chunks[n], app, focused == Some(FocusTarget::AttachPath));
        draw_attachment_list(
            frame,
            chunks[n + 1],
            app,
            focused == Some(FocusTarget::AttachmentList),
        );
    }

    if let Some(error) = state.intake.validation_error() {
        let line = Paragraph::new(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(line, chunks[chunks.len() - 1]);
    }
}

fn border(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_attach_input(frame: &mut Frame, area: Rect, app: &App, is_active: bool) {
    let path = &app.state.attach_path;
    let line = if path.is_empty() && !is_active {
        Line::from(Span::styled(
            "(path to a file, then Enter)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(path.as_str())];
        if is_active {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };

    let title = format!(
        " Attach a file (max {}, {} files) ",
        format_size(MAX_FILE_SIZE),
        MAX_ATTACHMENTS
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border(is_active));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_attachment_list(frame: &mut Frame, area: Rect, app: &App, is_active: bool) {
    let staged = app.state.attachments.attachments();
    let items: Vec<ListItem> = if staged.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No files attached",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        staged
            .iter()
            .map(|a| {
                ListItem::new(Line::from(vec![
                    Span::raw(a.name.clone()),
                    Span::styled(
                        format!("  {} · {}", format_size(a.size), a.kind.mime()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Attachments ")
                .borders(Borders::ALL)
                .border_style(border(is_active)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if is_active && !staged.is_empty() {
        list_state.select(Some(app.state.selected_attachment));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
