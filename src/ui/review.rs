//! Review & Submit step

use crate::app::App;
use crate::state::{format_size, Step};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.state.intake.form();
    let label_style = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    for step in Step::INPUT_STEPS {
        lines.push(Line::from(Span::styled(
            step.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for field in step.fields() {
            let value = form.display_value(*field);
            let value = if value.trim().is_empty() {
                Span::styled("-", label_style)
            } else {
                Span::raw(value)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", field.label()), label_style),
                value,
            ]));
        }
        lines.push(Line::from(""));
    }

    let staged = app.state.attachments.attachments();
    lines.push(Line::from(Span::styled(
        format!("Attachments ({})", staged.len()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    for attachment in staged {
        lines.push(Line::from(format!(
            "  {} ({})",
            attachment.name,
            format_size(attachment.size)
        )));
    }

    if let Some(error) = &app.state.submit_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ", Step::Review.title()))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
