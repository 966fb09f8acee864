//! System clipboard access for copying message text.
//!
//! Self-contained arboard wrapper; clipboard failures surface as a status
//! notice, never as a crash.

/// Copy plain text to the system clipboard.
pub fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text).map_err(|e| e.to_string())
}
