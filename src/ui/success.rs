//! Confirmation screen after a request was saved

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(receipt) = &app.state.receipt else {
        return;
    };

    let thanks = match receipt.record.get_str("name") {
        Some(name) if !name.trim().is_empty() => {
            format!("Thanks, {}! Your request has been sent.", name.trim())
        }
        _ => "Thanks! Your request has been sent.".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            thanks,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Reference: ", Style::default().fg(Color::DarkGray)),
            Span::raw(receipt.record.id.clone()),
        ]),
    ];

    if !receipt.uploaded.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("Files received:"));
        for (name, path) in &receipt.uploaded {
            let link = app.state.signed_link(path);
            let mut spans = vec![Span::raw(format!("  {name}"))];
            if let Some(url) = link {
                spans.push(Span::styled(
                    format!("  {url}"),
                    Style::default().fg(Color::Blue),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    if let Some(warning) = &receipt.warning {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            warning.message(),
            Style::default().fg(Color::Yellow),
        )));
        for failed in &warning.failed_uploads {
            lines.push(Line::from(Span::styled(
                format!("  {}: {}", failed.file_name, failed.reason),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let (title, border) = if receipt.is_partial() {
        (" Request sent, with problems ", Color::Yellow)
    } else {
        (" Request sent ", Color::Green)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
