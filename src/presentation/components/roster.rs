use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use serde_json::Value;

/// The pane mirroring each record the endpoint returned, newest last.
pub fn render_roster(frame: &mut Frame<'_>, area: Rect, created: &[Value]) {
    let title = format!("Created users ({})", created.len());
    let block = Block::default().title(title).borders(Borders::ALL);

    if created.is_empty() {
        let placeholder = Paragraph::new("No users created yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let body = serde_json::to_string_pretty(&Value::Array(created.to_vec()))
        .unwrap_or_else(|_| "<unrenderable>".to_string());
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Green))
        .block(block);
    frame.render_widget(paragraph, area);
}
