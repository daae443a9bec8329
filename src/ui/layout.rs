//! Screen layout: header, body and status bar

use crate::app::App;
use crate::state::{format_size, FieldName, FocusTarget, Step, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split the screen into (header, body, status bar)
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Step progress, e.g. "● ● ○ ○  Step 2/4 · Project Details"
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Start a project ",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];

    match app.state.current_view {
        View::Wizard => {
            let current = app.state.current_step();
            for step in Step::ALL {
                let (dot, color) = if step < current && app.state.intake.can_advance(step) {
                    ("●", Color::Green)
                } else if step == current {
                    ("●", Color::Cyan)
                } else {
                    ("○", Color::DarkGray)
                };
                spans.push(Span::styled(format!("{dot} "), Style::default().fg(color)));
            }
            spans.push(Span::raw(format!(
                " Step {}/{} · {}",
                current.number(),
                Step::ALL.len(),
                current.title()
            )));
        }
        View::Success => spans.push(Span::styled(
            "Request sent",
            Style::default().fg(Color::Green),
        )),
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn view_hints(app: &App) -> &'static str {
    match app.state.current_view {
        View::Success => "Enter: new request | c: copy reference | l: file links | q: quit",
        View::Wizard => match (app.state.current_step(), app.state.focused()) {
            (Step::Review, _) => "Enter/Ctrl+S: submit | Esc: back",
            (_, Some(FocusTarget::AttachPath)) => "Enter: attach file | Tab: next | Esc: back",
            (_, Some(FocusTarget::AttachmentList)) => "↑↓: select | Del: remove | Esc: back",
            (_, Some(FocusTarget::Field(FieldName::Description))) => {
                "Enter: new line | Tab: next field | Ctrl+N: continue | Esc: back"
            }
            (Step::AboutYou, _) => "Tab: next field | Enter: continue | Esc: quit",
            _ => "Tab: next field | ←→: choose | Ctrl+N: continue | Esc: back",
        },
    }
}

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Backend status
    let backend = if app.state.backend_configured {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ offline ", Style::default().fg(Color::Red))
    };
    spans.push(backend);

    spans.push(Span::styled(
        view_hints(app),
        Style::default().fg(Color::DarkGray),
    ));

    let attachments = &app.state.attachments;
    if !attachments.is_empty() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!(
                "📎 {} ({})",
                attachments.len(),
                format_size(attachments.total_bytes())
            ),
            Style::default().fg(Color::Blue),
        ));
    }

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
