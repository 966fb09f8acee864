//! VeritasTrial TUI - a terminal client for clinical-trial retrieval and
//! per-trial chat.
//!
//! This library exposes modules for use in integration tests.

pub mod app;
pub mod backend;
pub mod clipboard;
pub mod config;
pub mod format;
pub mod input;
pub mod models;
pub mod session;
pub mod ui;
