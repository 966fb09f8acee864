//! Input box: the active thread's pending query with a cursor marker.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

use super::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM};

const PLACEHOLDER: &str = "Enter your query here...";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let thread = app.registry.active_thread();
    let pending = &thread.pending_query;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if thread.loading {
            COLOR_BORDER
        } else {
            COLOR_ACCENT
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if pending.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(COLOR_DIM)))
    } else {
        // Keep the tail visible when the input outgrows the box
        let width = inner.width.saturating_sub(1) as usize;
        let mut visible = pending.as_str();
        while visible.width() > width {
            let mut chars = visible.chars();
            chars.next();
            visible = chars.as_str();
        }
        Line::from(vec![
            Span::raw(visible.to_string()),
            Span::styled("▏", Style::default().fg(COLOR_ACCENT)),
        ])
    };
    frame.render_widget(Paragraph::new(line), inner);
}
