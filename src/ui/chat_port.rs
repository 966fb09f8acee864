//! Message port: renders the active thread's message log.
//!
//! Messages are wrapped to the viewport width and the view is anchored to
//! the bottom; the per-thread scroll offset counts lines up from the
//! latest message.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::session::{Message, MessageContent, DEFAULT_THREAD_ID};

use super::{wrap_text, COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_USER, SPINNER_FRAMES};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let thread = app.registry.active_thread();
    let title = if thread.id == DEFAULT_THREAD_ID {
        " Retrieval ".to_string()
    } else {
        format!(" {} ", thread.title())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in &thread.messages {
        push_message_lines(&mut lines, message, width);
    }
    if thread.loading {
        let spinner = SPINNER_FRAMES[app.tick_count as usize % SPINNER_FRAMES.len()];
        let label = if thread.id == DEFAULT_THREAD_ID {
            "Retrieving trials..."
        } else {
            "Waiting for response..."
        };
        lines.push(Line::from(Span::styled(
            format!("{spinner} {label}"),
            Style::default().fg(COLOR_DIM),
        )));
    }

    // Anchor to the bottom, offset by the per-thread scroll
    let height = inner.height as usize;
    let offset = app.active_scroll() as usize;
    let end = lines.len().saturating_sub(offset);
    let start = end.saturating_sub(height);
    let visible: Vec<Line> = lines[start..end].to_vec();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn push_message_lines(lines: &mut Vec<Line>, message: &Message, width: usize) {
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    let (header, header_color) = if message.from_user {
        ("you", COLOR_USER)
    } else if matches!(message.content, MessageContent::Error(_)) {
        ("error", COLOR_ERROR)
    } else {
        ("veritas", COLOR_ACCENT)
    };
    lines.push(Line::from(Span::styled(
        format!("▸ {header}"),
        Style::default()
            .fg(header_color)
            .add_modifier(Modifier::BOLD),
    )));
    let body_style = if matches!(message.content, MessageContent::Error(_)) {
        Style::default().fg(COLOR_ERROR)
    } else {
        Style::default()
    };
    for wrapped in wrap_text(&message.plain_text(), width) {
        lines.push(Line::from(Span::styled(format!("  {wrapped}"), body_style)));
    }
}
