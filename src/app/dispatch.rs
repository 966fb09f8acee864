//! Send-flow dispatch: routing user input to backend requests.
//!
//! The side-effect ordering here is load-bearing: the pending input is
//! cleared, the user message appended and the loading flag raised before
//! the request task is spawned, so the user's turn is never lost even if
//! the request fails immediately. Every spawned task captures the target
//! thread id at dispatch time.

use std::sync::Arc;

use crate::models::{ModelId, TrialFilters};
use crate::session::{Message, MessageContent, DEFAULT_THREAD_ID};

use super::{App, AppMessage, SlashCommand};

/// Local filter commands recognized on the retrieval thread.
#[derive(Debug, Clone, PartialEq)]
pub enum FiltersAction {
    /// `/filters` - show the current filter criteria.
    Show,
    /// `/filters clear` - reset all filter criteria.
    Clear,
    /// `/filters key=value ...` - set individual criteria.
    Set(Vec<(String, String)>),
}

impl FiltersAction {
    /// Parse a `/filters` command; `None` when the input is not one.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let rest = trimmed.strip_prefix("/filters")?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            // e.g. "/filtersxyz" is ordinary input, not a command
            return None;
        }
        let rest = rest.trim();
        if rest.is_empty() {
            return Some(FiltersAction::Show);
        }
        if rest == "clear" {
            return Some(FiltersAction::Clear);
        }
        let pairs = rest
            .split_whitespace()
            .map(|pair| {
                let (key, value) = pair.split_once('=')?;
                Some((key.to_string(), value.to_string()))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(FiltersAction::Set(pairs))
    }
}

/// Apply one `key=value` pair to the filter set; `Err` names the bad key
/// or value.
fn apply_filter_pair(filters: &mut TrialFilters, key: &str, value: &str) -> Result<(), String> {
    match key {
        "studyType" => filters.study_type = Some(value.to_string()),
        "studyPhases" => filters.study_phases = Some(value.to_string()),
        "eligibleSex" => filters.eligible_sex = Some(value.to_string()),
        "lastUpdateDate" => filters.last_update_date = Some(value.to_string()),
        "minAge" => {
            filters.min_age =
                Some(value.parse().map_err(|_| format!("invalid minAge: {value}"))?)
        }
        "maxAge" => {
            filters.max_age =
                Some(value.parse().map_err(|_| format!("invalid maxAge: {value}"))?)
        }
        _ => return Err(format!("unknown filter key: {key}")),
    }
    Ok(())
}

fn describe_filters(filters: &TrialFilters) -> String {
    if filters.active_count() == 0 {
        return "No filters set. Use /filters key=value with keys: studyType, \
                studyPhases, minAge, maxAge, eligibleSex, lastUpdateDate."
            .to_string();
    }
    let mut lines = vec!["Active filters:".to_string()];
    if let Some(value) = &filters.study_type {
        lines.push(format!("- studyType = {value}"));
    }
    if let Some(value) = &filters.study_phases {
        lines.push(format!("- studyPhases = {value}"));
    }
    if let Some(value) = filters.min_age {
        lines.push(format!("- minAge = {value}"));
    }
    if let Some(value) = filters.max_age {
        lines.push(format!("- maxAge = {value}"));
    }
    if let Some(value) = &filters.eligible_sex {
        lines.push(format!("- eligibleSex = {value}"));
    }
    if let Some(value) = &filters.last_update_date {
        lines.push(format!("- lastUpdateDate = {value}"));
    }
    lines.join("\n")
}

impl App {
    /// Submit the active thread's pending input.
    ///
    /// Routes to retrieve on the retrieval thread and to chat or a
    /// slash-command on trial-chat threads. Blocked while the thread
    /// already has a request in flight.
    pub fn submit_input(&mut self) {
        let thread_id = self.registry.active_id().to_string();
        let thread = self.registry.active_thread();
        let query = thread.pending_query.trim().to_string();
        if query.is_empty() || thread.loading {
            return;
        }
        let model = thread.model;

        if thread_id == DEFAULT_THREAD_ID {
            if let Some(action) = FiltersAction::parse(&query) {
                self.handle_filters_command(&thread_id, query.clone(), action);
                return;
            }
        }

        // Ordered: clear input, append user message, raise loading, all
        // visible before the request is issued
        self.registry = self
            .registry
            .set_pending_query(&thread_id, "")
            .append_message(&thread_id, Message::user(query.clone()))
            .set_loading(&thread_id, true);
        self.scroll_offsets.insert(thread_id.clone(), 0);
        self.mark_dirty();

        if thread_id == DEFAULT_THREAD_ID {
            self.spawn_retrieve(thread_id, query);
        } else if let Some(command) = SlashCommand::parse(&query) {
            self.spawn_meta(thread_id, command);
        } else {
            self.spawn_chat(thread_id, query, model.unwrap_or_default());
        }
    }

    /// Handle a local `/filters` command; no network involved.
    fn handle_filters_command(&mut self, thread_id: &str, query: String, action: FiltersAction) {
        let reply = match action {
            FiltersAction::Show => Message::bot(MessageContent::Text(describe_filters(
                &self.filters,
            ))),
            FiltersAction::Clear => {
                self.filters = TrialFilters::default();
                Message::bot(MessageContent::Text("Filters cleared.".to_string()))
            }
            FiltersAction::Set(pairs) => {
                let mut updated = self.filters.clone();
                let result = pairs
                    .iter()
                    .try_for_each(|(key, value)| apply_filter_pair(&mut updated, key, value));
                match result {
                    Ok(()) => {
                        self.filters = updated;
                        Message::bot(MessageContent::Text(describe_filters(&self.filters)))
                    }
                    Err(err) => Message::error(err),
                }
            }
        };
        self.registry = self
            .registry
            .set_pending_query(thread_id, "")
            .append_message(thread_id, Message::user(query))
            .append_message(thread_id, reply);
        self.scroll_offsets.insert(thread_id.to_string(), 0);
        self.mark_dirty();
    }

    fn spawn_retrieve(&self, thread_id: String, query: String) {
        let tx = self.message_sender();
        let client = Arc::clone(&self.client);
        let top_k = self.top_k;
        let filters = self.filters.clone();
        tokio::spawn(async move {
            let result = client
                .retrieve(&query, top_k, &filters)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(AppMessage::RetrieveComplete { thread_id, result });
        });
    }

    fn spawn_chat(&self, thread_id: String, query: String, model: ModelId) {
        let tx = self.message_sender();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client
                .chat(&query, model, &thread_id)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(AppMessage::ChatComplete { thread_id, result });
        });
    }

    fn spawn_meta(&self, thread_id: String, command: SlashCommand) {
        let tx = self.message_sender();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client
                .meta(&thread_id)
                .await
                .map(Box::new)
                .map_err(|err| err.to_string());
            let _ = tx.send(AppMessage::MetaComplete {
                thread_id,
                command,
                result,
            });
        });
    }

    /// Spawn a heartbeat probe; the result arrives as
    /// [`AppMessage::ConnectionStatus`].
    pub fn check_connection(&self) {
        let tx = self.message_sender();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let connected = client.heartbeat().await.unwrap_or_default();
            let _ = tx.send(AppMessage::ConnectionStatus(connected));
        });
    }

    /// Open a chat on entry `index` (zero-based) of the most recent
    /// retrieval listing in the retrieval thread.
    pub fn open_chat_from_retrieval(&mut self, index: usize) {
        let Some(default_thread) = self.registry.thread(DEFAULT_THREAD_ID) else {
            return;
        };
        let listing = default_thread
            .messages
            .iter()
            .rev()
            .find_map(|message| match &message.content {
                MessageContent::Retrieved { ids, titles } => Some((ids, titles)),
                _ => None,
            });
        let Some((ids, titles)) = listing else {
            return;
        };
        let (Some(id), title) = (ids.get(index), titles.get(index)) else {
            return;
        };
        let meta = title.map(|title| crate::session::ThreadMeta {
            title: title.clone(),
        });
        let id = id.clone();
        self.switch_to(&id, meta);
        self.notice = Some(format!("Chat started: {id}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_show_clear_set() {
        assert_eq!(FiltersAction::parse("/filters"), Some(FiltersAction::Show));
        assert_eq!(
            FiltersAction::parse("  /filters  "),
            Some(FiltersAction::Show)
        );
        assert_eq!(
            FiltersAction::parse("/filters clear"),
            Some(FiltersAction::Clear)
        );
        assert_eq!(
            FiltersAction::parse("/filters minAge=18 studyType=INTERVENTIONAL"),
            Some(FiltersAction::Set(vec![
                ("minAge".to_string(), "18".to_string()),
                ("studyType".to_string(), "INTERVENTIONAL".to_string()),
            ]))
        );
        // Prefix collisions and malformed pairs are ordinary input
        assert_eq!(FiltersAction::parse("/filtersxyz"), None);
        assert_eq!(FiltersAction::parse("/filters minAge"), None);
        assert_eq!(FiltersAction::parse("find trials"), None);
    }

    #[test]
    fn filter_pairs_apply_and_reject_unknown_keys() {
        let mut filters = TrialFilters::default();
        apply_filter_pair(&mut filters, "minAge", "18").unwrap();
        apply_filter_pair(&mut filters, "eligibleSex", "FEMALE").unwrap();
        assert_eq!(filters.min_age, Some(18));
        assert_eq!(filters.eligible_sex.as_deref(), Some("FEMALE"));
        assert!(apply_filter_pair(&mut filters, "bogus", "x").is_err());
        assert!(apply_filter_pair(&mut filters, "minAge", "abc").is_err());
    }
}
