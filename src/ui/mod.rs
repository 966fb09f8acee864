//! UI rendering for the VeritasTrial terminal client.
//!
//! Two-panel layout: a sidebar listing the retrieval thread plus one entry
//! per trial-chat thread, and a main panel with the active thread's
//! message port, hint line and input box.

mod chat_port;
mod input_box;
mod sidebar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::session::DEFAULT_THREAD_ID;

/// Primary border color.
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color for highlights and the active thread.
pub const COLOR_ACCENT: Color = Color::LightCyan;

/// User message color.
pub const COLOR_USER: Color = Color::LightGreen;

/// Error bubble color.
pub const COLOR_ERROR: Color = Color::LightRed;

/// Dim text for hints and secondary info.
pub const COLOR_DIM: Color = Color::DarkGray;

/// Spinner frames for in-flight requests.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the whole interface.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    sidebar::render(frame, app, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    render_header(frame, app, rows[0]);
    chat_port::render(frame, app, rows[1]);
    render_hints(frame, app, rows[2]);
    input_box::render(frame, app, rows[3]);
    render_status(frame, app, rows[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (status_text, status_style) = match app.connected {
        Some(true) => ("● connected", Style::default().fg(Color::LightGreen)),
        Some(false) => ("○ offline", Style::default().fg(COLOR_ERROR)),
        None => ("… probing", Style::default().fg(COLOR_DIM)),
    };
    let line = Line::from(vec![
        Span::styled(
            " VeritasTrial ",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, status_style),
        Span::styled(
            format!("  {}", app.client.base_url()),
            Style::default().fg(COLOR_DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Context-dependent hint line above the input box.
fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let thread = app.registry.active_thread();
    let line = if thread.id == DEFAULT_THREAD_ID {
        Line::from(vec![
            Span::styled(
                format!(" top-k: {} (Ctrl+↑/↓)", app.top_k),
                Style::default().fg(COLOR_DIM),
            ),
            Span::styled(
                format!("  filters: {} active (/filters)", app.filters.active_count()),
                Style::default().fg(COLOR_DIM),
            ),
            Span::styled("  Alt+1..9 start a chat", Style::default().fg(COLOR_DIM)),
        ])
    } else {
        let model = thread
            .model
            .map(|model| model.label())
            .unwrap_or("unknown model");
        Line::from(vec![
            Span::styled(" /meta  /docs ", Style::default().fg(COLOR_ACCENT)),
            Span::styled(
                format!(" model: {model} (Ctrl+P)"),
                Style::default().fg(COLOR_DIM),
            ),
            Span::styled(
                format!("  {}/{}", crate::format::CTGOV_URL, thread.id),
                Style::default().fg(COLOR_DIM),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Bottom status line: transient notice or the keybind summary.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.notice {
        Some(notice) => notice.clone(),
        None => {
            " Enter send · Tab threads · Ctrl+W delete · Ctrl+L clear all · \
             Ctrl+X history · Ctrl+Y copy · Ctrl+C quit"
                .to_string()
        }
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(COLOR_DIM),
        ))),
        area,
    );
}

/// Wrap text to the given display width, breaking on whitespace where
/// possible. Width accounting uses unicode display widths.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if width == 0 {
        return vec![String::new()];
    }
    let mut wrapped = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        let mut current = String::new();
        // split_inclusive keeps each word's trailing spaces, so space
        // runs and leading indentation survive wrapping
        for word in raw_line.split_inclusive(' ') {
            let visible = word.trim_end_matches(' ');
            if visible.is_empty() {
                // A run of spaces: kept verbatim, trimmed later if it
                // ends up at a break
                current.push_str(word);
                continue;
            }
            if !current.is_empty() && current.width() + visible.width() > width {
                let flushed = std::mem::take(&mut current);
                let flushed = flushed.trim_end_matches(' ');
                if !flushed.is_empty() {
                    wrapped.push(flushed.to_string());
                }
            }
            if visible.width() <= width {
                current.push_str(word);
                continue;
            }
            // Hard-break words longer than the width
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current.width() + ch_width > width {
                    wrapped.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        wrapped.push(current.trim_end_matches(' ').to_string());
    }
    wrapped
}
