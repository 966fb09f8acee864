//! Client-side session model: threads, message logs and the registry.
//!
//! A session holds one always-present retrieval thread (id `"default"`)
//! plus any number of per-trial chat threads keyed by trial id. All
//! registry transitions are pure: they take `&self` and return a new
//! [`SessionRegistry`] value, mirroring the copy-on-write discipline the
//! UI relies on for change detection and that substitutes for locking
//! when async completions resolve out of order.

use std::collections::HashMap;

use crate::format;
use crate::models::{ModelId, Reference, TrialDocument, TrialMetadata};

/// Reserved id of the always-present retrieval thread.
pub const DEFAULT_THREAD_ID: &str = "default";

/// Renderable payload of a single chat entry.
///
/// A small closed set of content kinds so the session core does not
/// depend on any UI node type.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text (user input or chat model response).
    Text(String),
    /// Normalized backend error, shown as an in-thread error bubble.
    Error(String),
    /// Numbered listing of retrieved trials.
    Retrieved {
        ids: Vec<String>,
        titles: Vec<String>,
    },
    /// References and related documents of a trial (`/docs`).
    Docs {
        references: Vec<Reference>,
        documents: Vec<TrialDocument>,
    },
    /// Full metadata dump of a trial (`/meta`).
    MetaDump(Box<TrialMetadata>),
}

/// One entry in a thread's message log.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub from_user: bool,
    pub content: MessageContent,
}

impl Message {
    /// A user-authored text message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            from_user: true,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A bot message with arbitrary content.
    pub fn bot(content: MessageContent) -> Self {
        Self {
            from_user: false,
            content,
        }
    }

    /// A bot error bubble.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            from_user: false,
            content: MessageContent::Error(text.into()),
        }
    }

    /// Plain-text representation, used for clipboard copy.
    pub fn plain_text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) | MessageContent::Error(text) => text.clone(),
            MessageContent::Retrieved { ids, titles } => format::format_retrieved(ids, titles),
            MessageContent::Docs {
                references,
                documents,
            } => format::format_docs(references, documents),
            MessageContent::MetaDump(meta) => format::format_meta(meta),
        }
    }
}

/// Display metadata of a trial-chat thread, captured once at creation
/// from the retrieval result that spawned it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMeta {
    pub title: String,
}

/// One independent conversation context.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: String,
    pub messages: Vec<Message>,
    /// Trial display metadata; `None` for the retrieval thread.
    pub meta: Option<ThreadMeta>,
    /// Selected chat model; `None` for the retrieval thread.
    pub model: Option<ModelId>,
    pub pending_query: String,
    pub loading: bool,
}

impl Thread {
    fn new(id: impl Into<String>, meta: Option<ThreadMeta>) -> Self {
        let id = id.into();
        let model = (id != DEFAULT_THREAD_ID).then(ModelId::default);
        Self {
            id,
            messages: Vec::new(),
            meta,
            model,
            pending_query: String::new(),
            loading: false,
        }
    }

    /// Sidebar title: the trial title when known, otherwise the id.
    pub fn title(&self) -> &str {
        match &self.meta {
            Some(meta) if !meta.title.is_empty() => &meta.title,
            _ => &self.id,
        }
    }
}

/// The authoritative map of all threads plus which one is active.
///
/// Invariants: the `"default"` thread is always present and `active_id`
/// always names a present thread.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRegistry {
    threads: HashMap<String, Thread>,
    /// Creation order of thread ids, `"default"` first.
    order: Vec<String>,
    active_id: String,
}

impl SessionRegistry {
    /// Fresh registry containing only the retrieval thread.
    pub fn new() -> Self {
        let default_thread = Thread::new(DEFAULT_THREAD_ID, None);
        Self {
            threads: HashMap::from([(DEFAULT_THREAD_ID.to_string(), default_thread)]),
            order: vec![DEFAULT_THREAD_ID.to_string()],
            active_id: DEFAULT_THREAD_ID.to_string(),
        }
    }

    /// Id of the currently active thread.
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The currently active thread.
    pub fn active_thread(&self) -> &Thread {
        // Both lookups are covered by the registry invariants; the default
        // fallback makes this total even if a caller violates them.
        self.threads
            .get(&self.active_id)
            .or_else(|| self.threads.get(DEFAULT_THREAD_ID))
            .expect("registry always contains the default thread")
    }

    /// Look up a thread by id.
    pub fn thread(&self, id: &str) -> Option<&Thread> {
        self.threads.get(id)
    }

    /// Whether the given thread id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.threads.contains_key(id)
    }

    /// Threads in creation order, `"default"` first.
    pub fn threads_ordered(&self) -> impl Iterator<Item = &Thread> {
        self.order.iter().filter_map(|id| self.threads.get(id))
    }

    /// Number of threads, including the retrieval thread.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Switch to a thread, creating it first if absent.
    ///
    /// Creating never overwrites an existing thread's log or meta (first
    /// write wins); in all cases the thread becomes active. Total over any
    /// id string.
    pub fn switch_or_create(&self, id: &str, meta: Option<ThreadMeta>) -> Self {
        let mut next = self.clone();
        if !next.threads.contains_key(id) {
            next.threads.insert(id.to_string(), Thread::new(id, meta));
            next.order.push(id.to_string());
        }
        next.active_id = id.to_string();
        next
    }

    /// Remove a thread and reset the active thread to `"default"`.
    ///
    /// The reset is unconditional even when the deleted thread was not
    /// active, matching the observed behavior of the original client.
    /// Deleting `"default"` is a programming error (the UI never offers
    /// it) and is a no-op here.
    pub fn delete_thread(&self, id: &str) -> Self {
        debug_assert!(id != DEFAULT_THREAD_ID, "the default thread is never deletable");
        if id == DEFAULT_THREAD_ID {
            return self.clone();
        }
        let mut next = self.clone();
        next.threads.remove(id);
        next.order.retain(|existing| existing != id);
        next.active_id = DEFAULT_THREAD_ID.to_string();
        next
    }

    /// Remove every thread except `"default"`, preserving its message log,
    /// and reset the active thread.
    pub fn clear_all(&self) -> Self {
        let mut next = self.clone();
        next.threads.retain(|id, _| id == DEFAULT_THREAD_ID);
        next.order.retain(|id| id == DEFAULT_THREAD_ID);
        next.active_id = DEFAULT_THREAD_ID.to_string();
        next
    }

    /// Append a message to the addressed thread's log.
    ///
    /// Silent no-op when the thread no longer exists: a request completing
    /// after its thread was deleted is a normal race, not a fault.
    pub fn append_message(&self, id: &str, message: Message) -> Self {
        self.with_thread(id, |thread| thread.messages.push(message))
    }

    /// Clear the addressed thread's message log (per-thread history clear).
    pub fn clear_messages(&self, id: &str) -> Self {
        self.with_thread(id, |thread| thread.messages.clear())
    }

    /// Replace the addressed thread's pending input.
    pub fn set_pending_query(&self, id: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with_thread(id, move |thread| thread.pending_query = text)
    }

    /// Set the addressed thread's loading flag.
    pub fn set_loading(&self, id: &str, loading: bool) -> Self {
        self.with_thread(id, |thread| thread.loading = loading)
    }

    /// Set the addressed thread's selected chat model.
    pub fn set_model(&self, id: &str, model: ModelId) -> Self {
        self.with_thread(id, |thread| thread.model = Some(model))
    }

    /// Scoped update of one thread; no-op when the id is absent.
    fn with_thread(&self, id: &str, update: impl FnOnce(&mut Thread)) -> Self {
        let mut next = self.clone();
        if let Some(thread) = next.threads.get_mut(id) {
            update(thread);
        }
        next
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str) -> Option<ThreadMeta> {
        Some(ThreadMeta {
            title: title.to_string(),
        })
    }

    #[test]
    fn new_registry_contains_only_default() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.active_id(), DEFAULT_THREAD_ID);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(DEFAULT_THREAD_ID));
        assert!(registry.active_thread().meta.is_none());
        assert!(registry.active_thread().model.is_none());
    }

    #[test]
    fn switch_or_create_inserts_empty_thread_and_activates() {
        let registry = SessionRegistry::new().switch_or_create("NCT001", meta("Trial one"));
        assert_eq!(registry.active_id(), "NCT001");
        let thread = registry.thread("NCT001").unwrap();
        assert!(thread.messages.is_empty());
        assert_eq!(thread.title(), "Trial one");
        assert_eq!(thread.model, Some(ModelId::default()));
        assert!(registry.contains(DEFAULT_THREAD_ID));
    }

    #[test]
    fn switch_or_create_on_default_never_alters_its_log() {
        let registry = SessionRegistry::new()
            .append_message(DEFAULT_THREAD_ID, Message::user("hello"))
            .switch_or_create("NCT001", meta("Trial one"))
            .switch_or_create(DEFAULT_THREAD_ID, meta("bogus"));
        assert_eq!(registry.active_id(), DEFAULT_THREAD_ID);
        let default = registry.thread(DEFAULT_THREAD_ID).unwrap();
        assert_eq!(default.messages.len(), 1);
        assert!(default.meta.is_none());
    }

    #[test]
    fn switch_or_create_is_first_write_wins_for_meta_and_log() {
        let registry = SessionRegistry::new()
            .switch_or_create("NCT001", meta("first"))
            .append_message("NCT001", Message::user("kept"))
            .switch_or_create(DEFAULT_THREAD_ID, None)
            .switch_or_create("NCT001", meta("second"));
        assert_eq!(registry.active_id(), "NCT001");
        let thread = registry.thread("NCT001").unwrap();
        assert_eq!(thread.meta.as_ref().unwrap().title, "first");
        assert_eq!(thread.messages.len(), 1);
    }

    #[test]
    fn delete_thread_always_resets_active_to_default() {
        // Delete the active thread
        let registry = SessionRegistry::new()
            .switch_or_create("NCT001", meta("one"))
            .delete_thread("NCT001");
        assert_eq!(registry.active_id(), DEFAULT_THREAD_ID);
        assert!(!registry.contains("NCT001"));

        // Delete a non-active thread: active still resets (observed
        // behavior of the original client)
        let registry = SessionRegistry::new()
            .switch_or_create("NCT001", meta("one"))
            .switch_or_create("NCT002", meta("two"))
            .delete_thread("NCT001");
        assert_eq!(registry.active_id(), DEFAULT_THREAD_ID);
        assert!(!registry.contains("NCT001"));
        assert!(registry.contains("NCT002"));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn delete_default_is_a_noop() {
        let registry = SessionRegistry::new().delete_thread(DEFAULT_THREAD_ID);
        assert!(registry.contains(DEFAULT_THREAD_ID));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "never deletable")]
    fn delete_default_is_a_programming_error() {
        let _ = SessionRegistry::new().delete_thread(DEFAULT_THREAD_ID);
    }

    #[test]
    fn clear_all_keeps_only_default_with_log_intact() {
        let registry = SessionRegistry::new()
            .append_message(DEFAULT_THREAD_ID, Message::user("query"))
            .append_message(
                DEFAULT_THREAD_ID,
                Message::bot(MessageContent::Retrieved {
                    ids: vec!["NCT001".to_string()],
                    titles: vec!["one".to_string()],
                }),
            )
            .switch_or_create("NCT001", meta("one"))
            .switch_or_create("NCT002", meta("two"));
        let before = registry.thread(DEFAULT_THREAD_ID).unwrap().messages.clone();

        let cleared = registry.clear_all();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared.active_id(), DEFAULT_THREAD_ID);
        assert_eq!(cleared.thread(DEFAULT_THREAD_ID).unwrap().messages, before);
    }

    #[test]
    fn append_to_missing_thread_is_a_silent_noop() {
        let registry = SessionRegistry::new();
        let next = registry.append_message("NCT404", Message::user("lost"));
        assert_eq!(next, registry);
        assert!(!next.contains("NCT404"));
    }

    #[test]
    fn scoped_field_updates_target_only_the_addressed_thread() {
        let registry = SessionRegistry::new()
            .switch_or_create("NCT001", meta("one"))
            .set_pending_query("NCT001", "draft")
            .set_loading("NCT001", true)
            .set_model("NCT001", ModelId::GeminiFlash);
        let thread = registry.thread("NCT001").unwrap();
        assert_eq!(thread.pending_query, "draft");
        assert!(thread.loading);
        assert_eq!(thread.model, Some(ModelId::GeminiFlash));
        let default = registry.thread(DEFAULT_THREAD_ID).unwrap();
        assert_eq!(default.pending_query, "");
        assert!(!default.loading);
    }

    #[test]
    fn transitions_leave_the_previous_value_untouched() {
        let registry = SessionRegistry::new();
        let _next = registry
            .switch_or_create("NCT001", meta("one"))
            .append_message("NCT001", Message::user("hi"));
        // Copy-on-write: the original snapshot is unchanged
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id(), DEFAULT_THREAD_ID);
    }

    #[test]
    fn threads_ordered_is_creation_order_with_default_first() {
        let registry = SessionRegistry::new()
            .switch_or_create("NCT002", meta("two"))
            .switch_or_create("NCT001", meta("one"))
            .switch_or_create("NCT002", None);
        let ids: Vec<&str> = registry.threads_ordered().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![DEFAULT_THREAD_ID, "NCT002", "NCT001"]);
    }

    #[test]
    fn message_plain_text_covers_all_content_kinds() {
        assert_eq!(Message::user("hi").plain_text(), "hi");
        assert_eq!(Message::error("bad").plain_text(), "bad");
        let retrieved = Message::bot(MessageContent::Retrieved {
            ids: vec!["NCT001".to_string()],
            titles: vec!["one".to_string()],
        });
        assert!(retrieved.plain_text().contains("[1] one"));
        let docs = Message::bot(MessageContent::Docs {
            references: vec![],
            documents: vec![],
        });
        assert!(docs.plain_text().contains("No references found."));
    }
}
