//! Application state and logic for the TUI.
//!
//! The [`App`] owns the session registry, the backend client and the
//! message channel that async completions are delivered on. UI rendering
//! reads from it; key handling calls into it.

mod dispatch;
mod handlers;
mod messages;

pub use dispatch::FiltersAction;
pub use messages::{AppMessage, SlashCommand};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::BackendClient;
use crate::models::{ModelId, TrialFilters};
use crate::session::{SessionRegistry, ThreadMeta, DEFAULT_THREAD_ID};

/// Default number of trials to retrieve.
pub const DEFAULT_TOP_K: u32 = 3;

/// Top-k bounds accepted by the backend (0 < k <= 30).
pub const MAX_TOP_K: u32 = 30;

/// Main application state.
pub struct App {
    /// Authoritative session state; replaced wholesale on every transition.
    pub registry: SessionRegistry,
    /// Backend API client, shared with spawned request tasks.
    pub client: Arc<BackendClient>,
    /// Sender side of the completion channel, cloned into spawned tasks.
    message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver side; taken by the event loop.
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Number of trials requested per retrieve.
    pub top_k: u32,
    /// Filter criteria carried with every retrieve call.
    pub filters: TrialFilters,
    /// Backend connectivity; `None` until the first heartbeat resolves.
    pub connected: Option<bool>,
    /// Per-thread scroll offset in lines up from the bottom.
    pub scroll_offsets: HashMap<String, u16>,
    /// Transient one-line notice shown in the status area.
    pub notice: Option<String>,
    /// Flag to track if the app should quit.
    pub should_quit: bool,
    /// Redraw is needed on the next loop iteration.
    pub needs_redraw: bool,
    /// Tick counter driving the loading spinner.
    pub tick_count: u64,
}

impl App {
    /// Create the application state around a backend client.
    pub fn new(client: BackendClient) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            registry: SessionRegistry::new(),
            client: Arc::new(client),
            message_tx,
            message_rx: Some(message_rx),
            top_k: DEFAULT_TOP_K,
            filters: TrialFilters::default(),
            connected: None,
            scroll_offsets: HashMap::new(),
            notice: None,
            should_quit: false,
            needs_redraw: true,
            tick_count: 0,
        }
    }

    /// Get a clone of the message sender for passing to async tasks.
    pub fn message_sender(&self) -> mpsc::UnboundedSender<AppMessage> {
        self.message_tx.clone()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Advance the spinner tick.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Whether any thread has an in-flight request.
    pub fn any_loading(&self) -> bool {
        self.registry.threads_ordered().any(|thread| thread.loading)
    }

    // =========================================================================
    // Thread actions
    // =========================================================================

    /// Switch to (or create) a thread and reset its scroll to the bottom.
    pub fn switch_to(&mut self, id: &str, meta: Option<ThreadMeta>) {
        self.registry = self.registry.switch_or_create(id, meta);
        self.scroll_offsets.insert(id.to_string(), 0);
        self.notice = None;
        self.mark_dirty();
    }

    /// Switch to the next thread in sidebar order (wrapping).
    pub fn switch_next(&mut self) {
        self.switch_adjacent(1);
    }

    /// Switch to the previous thread in sidebar order (wrapping).
    pub fn switch_prev(&mut self) {
        self.switch_adjacent(-1);
    }

    fn switch_adjacent(&mut self, step: isize) {
        let ids: Vec<String> = self
            .registry
            .threads_ordered()
            .map(|thread| thread.id.clone())
            .collect();
        let Some(current) = ids.iter().position(|id| id == self.registry.active_id()) else {
            return;
        };
        let next = (current as isize + step).rem_euclid(ids.len() as isize) as usize;
        self.registry = self.registry.switch_or_create(&ids[next], None);
        self.mark_dirty();
    }

    /// Delete the active trial-chat thread; no-op on the retrieval thread.
    pub fn delete_active_thread(&mut self) {
        let active = self.registry.active_id().to_string();
        if active == DEFAULT_THREAD_ID {
            return;
        }
        self.registry = self.registry.delete_thread(&active);
        self.scroll_offsets.remove(&active);
        self.mark_dirty();
    }

    /// Remove all trial-chat threads, keeping the retrieval history.
    pub fn clear_all_threads(&mut self) {
        self.registry = self.registry.clear_all();
        self.scroll_offsets.retain(|id, _| id == DEFAULT_THREAD_ID);
        self.mark_dirty();
    }

    /// Clear the active thread's message log.
    pub fn clear_active_history(&mut self) {
        let active = self.registry.active_id().to_string();
        // Matches the original: the clear button is disabled while loading
        if self.registry.active_thread().loading {
            return;
        }
        self.registry = self.registry.clear_messages(&active);
        self.scroll_offsets.insert(active, 0);
        self.mark_dirty();
    }

    // =========================================================================
    // Input editing (pending query lives on the thread)
    // =========================================================================

    pub fn input_char(&mut self, c: char) {
        let active = self.registry.active_id().to_string();
        let mut pending = self.registry.active_thread().pending_query.clone();
        pending.push(c);
        self.registry = self.registry.set_pending_query(&active, pending);
        self.mark_dirty();
    }

    pub fn input_str(&mut self, text: &str) {
        let active = self.registry.active_id().to_string();
        let mut pending = self.registry.active_thread().pending_query.clone();
        pending.push_str(text);
        self.registry = self.registry.set_pending_query(&active, pending);
        self.mark_dirty();
    }

    pub fn input_backspace(&mut self) {
        let active = self.registry.active_id().to_string();
        let mut pending = self.registry.active_thread().pending_query.clone();
        pending.pop();
        self.registry = self.registry.set_pending_query(&active, pending);
        self.mark_dirty();
    }

    pub fn input_clear(&mut self) {
        let active = self.registry.active_id().to_string();
        self.registry = self.registry.set_pending_query(&active, "");
        self.mark_dirty();
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Cycle the active trial-chat thread's model; no-op on the retrieval
    /// thread.
    pub fn cycle_model(&mut self) {
        let active = self.registry.active_id().to_string();
        if let Some(model) = self.registry.active_thread().model {
            self.registry = self.registry.set_model(&active, model.next());
            self.mark_dirty();
        }
    }

    /// Active thread's model, if it is a trial-chat thread.
    pub fn active_model(&self) -> Option<ModelId> {
        self.registry.active_thread().model
    }

    /// Increase top-k, clamped to the backend's accepted range.
    pub fn top_k_up(&mut self) {
        if self.top_k < MAX_TOP_K {
            self.top_k += 1;
            self.mark_dirty();
        }
    }

    /// Decrease top-k, clamped to the backend's accepted range.
    pub fn top_k_down(&mut self) {
        if self.top_k > 1 {
            self.top_k -= 1;
            self.mark_dirty();
        }
    }

    // =========================================================================
    // Scrolling and clipboard
    // =========================================================================

    /// Scroll offset of the active thread.
    pub fn active_scroll(&self) -> u16 {
        *self
            .scroll_offsets
            .get(self.registry.active_id())
            .unwrap_or(&0)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let active = self.registry.active_id().to_string();
        let offset = self.scroll_offsets.entry(active).or_insert(0);
        *offset = offset.saturating_add(lines);
        self.mark_dirty();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let active = self.registry.active_id().to_string();
        let offset = self.scroll_offsets.entry(active).or_insert(0);
        *offset = offset.saturating_sub(lines);
        self.mark_dirty();
    }

    /// Copy the active thread's last message to the system clipboard.
    pub fn copy_last_message(&mut self) {
        let Some(message) = self.registry.active_thread().messages.last() else {
            return;
        };
        match crate::clipboard::copy_text(&message.plain_text()) {
            Ok(()) => self.notice = Some("Copied last message".to_string()),
            Err(err) => self.notice = Some(format!("Clipboard error: {err}")),
        }
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(BackendClient::with_base_url("http://127.0.0.1:1"))
    }

    #[test]
    fn top_k_starts_at_default_and_clamps_to_floor() {
        let mut app = test_app();
        assert_eq!(app.top_k, DEFAULT_TOP_K);
        for _ in 0..MAX_TOP_K {
            app.top_k_down();
        }
        assert_eq!(app.top_k, 1);
        // Another decrement at the floor stays at 1; the backend rejects
        // top_k = 0
        app.top_k_down();
        assert_eq!(app.top_k, 1);
    }

    #[test]
    fn top_k_clamps_to_ceiling() {
        let mut app = test_app();
        for _ in 0..2 * MAX_TOP_K {
            app.top_k_up();
        }
        assert_eq!(app.top_k, MAX_TOP_K);
        app.top_k_up();
        assert_eq!(app.top_k, MAX_TOP_K);
    }
}
