use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use serde_json::Value;

use crate::form::FormState;

use super::components::{render_dropdown, render_fields, render_footer, render_roster};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub form: &'a FormState,
    pub status_message: &'a str,
    pub submit_enabled: bool,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub created: &'a [Value],
    pub dropdown: Option<DropdownRender<'a>>,
}

pub struct DropdownRender<'a> {
    pub title: &'a str,
    pub options: &'a [&'static str],
    pub selected: usize,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let cursor_enabled = ctx.dropdown.is_none();
    render_fields(frame, chunks[0], &ctx, cursor_enabled);
    render_roster(frame, chunks[1], ctx.created);
    render_footer(frame, chunks[2], &ctx);

    if let Some(dropdown) = &ctx.dropdown {
        render_dropdown(frame, dropdown);
    }
}
