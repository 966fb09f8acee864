//! Completion handlers applying async results to the session.
//!
//! Each completion addresses the thread id captured at dispatch time.
//! When that thread was deleted while the request was in flight, the
//! registry transitions no-op: nothing is appended and no thread is
//! recreated.

use crate::session::{Message, MessageContent};

use super::{App, AppMessage, SlashCommand};

impl App {
    /// Apply one async completion to the application state.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::RetrieveComplete { thread_id, result } => {
                let reply = match result {
                    Ok(data) => Message::bot(MessageContent::Retrieved {
                        ids: data.ids,
                        titles: data.documents,
                    }),
                    Err(err) => {
                        tracing::warn!(%thread_id, %err, "retrieve failed");
                        Message::error(err)
                    }
                };
                self.finish_request(&thread_id, reply);
            }
            AppMessage::ChatComplete { thread_id, result } => {
                let reply = match result {
                    Ok(response) => Message::bot(MessageContent::Text(response)),
                    Err(err) => {
                        tracing::warn!(%thread_id, %err, "chat failed");
                        Message::error(err)
                    }
                };
                self.finish_request(&thread_id, reply);
            }
            AppMessage::MetaComplete {
                thread_id,
                command,
                result,
            } => {
                let reply = match result {
                    Ok(meta) => match command {
                        SlashCommand::Meta => Message::bot(MessageContent::MetaDump(meta)),
                        SlashCommand::Docs => Message::bot(MessageContent::Docs {
                            references: meta.references,
                            documents: meta.documents,
                        }),
                    },
                    Err(err) => {
                        tracing::warn!(%thread_id, %err, "meta fetch failed");
                        Message::error(err)
                    }
                };
                self.finish_request(&thread_id, reply);
            }
            AppMessage::ConnectionStatus(connected) => {
                self.connected = Some(connected);
                self.mark_dirty();
            }
        }
    }

    /// Append exactly one bot/error message and drop the loading flag.
    ///
    /// Both transitions silently no-op when the thread no longer exists.
    fn finish_request(&mut self, thread_id: &str, reply: Message) {
        self.registry = self
            .registry
            .append_message(thread_id, reply)
            .set_loading(thread_id, false);
        if thread_id == self.registry.active_id() {
            self.scroll_offsets.insert(thread_id.to_string(), 0);
        }
        self.mark_dirty();
    }
}
