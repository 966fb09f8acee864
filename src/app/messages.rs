//! AppMessage enum for async completions within the application.
//!
//! Every network completion carries the thread id captured when the
//! request was dispatched, never resolved from the active thread at
//! completion time.

use crate::models::{RetrieveResponse, TrialMetadata};

/// Slash-commands recognized in trial-chat threads.
///
/// Recognized only as the complete trimmed input, never as a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/meta` - full metadata dump of the trial.
    Meta,
    /// `/docs` - references and related documents of the trial.
    Docs,
}

impl SlashCommand {
    /// Parse an input into a slash-command, if it is exactly one.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "/meta" => Some(SlashCommand::Meta),
            "/docs" => Some(SlashCommand::Docs),
            _ => None,
        }
    }
}

/// Messages received from async operations.
///
/// Errors arrive pre-normalized as display strings; the handlers append
/// them as in-thread error bubbles.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A retrieve call finished for the addressed thread.
    RetrieveComplete {
        thread_id: String,
        result: Result<RetrieveResponse, String>,
    },
    /// A chat call finished for the addressed thread.
    ChatComplete {
        thread_id: String,
        result: Result<String, String>,
    },
    /// A metadata fetch (for `/meta` or `/docs`) finished for the
    /// addressed thread.
    MetaComplete {
        thread_id: String,
        command: SlashCommand,
        result: Result<Box<TrialMetadata>, String>,
    },
    /// Backend connectivity changed (heartbeat probe result).
    ConnectionStatus(bool),
}
