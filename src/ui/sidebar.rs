//! Sidebar panel: the retrieval thread plus one entry per trial chat.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::session::DEFAULT_THREAD_ID;

use super::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, SPINNER_FRAMES};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER_FRAMES[app.tick_count as usize % SPINNER_FRAMES.len()];
    let active_id = app.registry.active_id();

    let items: Vec<ListItem> = app
        .registry
        .threads_ordered()
        .map(|thread| {
            let label = if thread.id == DEFAULT_THREAD_ID {
                "Retrieve trials".to_string()
            } else {
                thread.id.clone()
            };
            let marker = if thread.loading { spinner } else { " " };
            let mut style = Style::default();
            if thread.id == active_id {
                style = style.fg(COLOR_ACCENT).add_modifier(Modifier::BOLD);
            }
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(COLOR_ACCENT)),
                Span::styled(label, style),
            ])];
            // Second row: truncated trial title under the id
            if thread.id != DEFAULT_THREAD_ID {
                let title = thread.title();
                let truncated: String = title.chars().take(26).collect();
                lines.push(Line::from(Span::styled(
                    format!("   {truncated}"),
                    Style::default().fg(COLOR_DIM),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let chat_count = app.registry.len() - 1;
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(COLOR_BORDER))
            .title(format!(" Threads ({chat_count} chats) ")),
    );
    frame.render_widget(list, area);
}
