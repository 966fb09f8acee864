//! Keyboard input mapping.
//!
//! The [`Command`] enum decouples key bindings from their effects; the
//! event loop maps each key press to a command and applies it to the
//! [`App`](crate::app::App).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// User actions triggerable from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application (Ctrl+C).
    Quit,
    /// Submit the pending input (Enter).
    Submit,
    /// Insert a character into the pending input.
    InsertChar(char),
    /// Delete the character before the cursor (Backspace).
    Backspace,
    /// Clear the pending input (Ctrl+U).
    ClearInput,
    /// Switch to the next thread (Tab).
    NextThread,
    /// Switch to the previous thread (Shift+Tab).
    PrevThread,
    /// Return to the retrieval thread (Esc).
    GoToRetrieval,
    /// Delete the active trial-chat thread (Ctrl+W).
    DeleteThread,
    /// Remove all trial-chat threads (Ctrl+L).
    ClearAllThreads,
    /// Clear the active thread's history (Ctrl+X).
    ClearHistory,
    /// Cycle the active thread's chat model (Ctrl+P).
    CycleModel,
    /// Increase retrieval top-k (Ctrl+Up).
    TopKUp,
    /// Decrease retrieval top-k (Ctrl+Down).
    TopKDown,
    /// Scroll the message port up.
    ScrollUp(u16),
    /// Scroll the message port down.
    ScrollDown(u16),
    /// Copy the last message to the clipboard (Ctrl+Y).
    CopyLastMessage,
    /// Open a chat on entry N of the latest retrieval listing (Alt+1..9).
    OpenResult(usize),
}

/// Map a key press to a command, if it is bound.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(Command::Quit),
        KeyCode::Char('u') if ctrl => Some(Command::ClearInput),
        KeyCode::Char('w') if ctrl => Some(Command::DeleteThread),
        KeyCode::Char('l') if ctrl => Some(Command::ClearAllThreads),
        KeyCode::Char('x') if ctrl => Some(Command::ClearHistory),
        KeyCode::Char('p') if ctrl => Some(Command::CycleModel),
        KeyCode::Char('y') if ctrl => Some(Command::CopyLastMessage),
        KeyCode::Up if ctrl => Some(Command::TopKUp),
        KeyCode::Down if ctrl => Some(Command::TopKDown),
        KeyCode::Char(c @ '1'..='9') if alt => Some(Command::OpenResult(c as usize - '1' as usize)),
        KeyCode::Tab => Some(Command::NextThread),
        KeyCode::BackTab => Some(Command::PrevThread),
        KeyCode::Esc => Some(Command::GoToRetrieval),
        KeyCode::Enter => Some(Command::Submit),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Up => Some(Command::ScrollUp(1)),
        KeyCode::Down => Some(Command::ScrollDown(1)),
        KeyCode::PageUp => Some(Command::ScrollUp(10)),
        KeyCode::PageDown => Some(Command::ScrollDown(10)),
        KeyCode::Char(c) if !ctrl && !alt => Some(Command::InsertChar(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut event = KeyEvent::new(code, modifiers);
        event.kind = KeyEventKind::Press;
        event
    }

    #[test]
    fn control_bindings() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('w'), KeyModifiers::CONTROL)),
            Some(Command::DeleteThread)
        );
        assert_eq!(
            map_key(key(KeyCode::Up, KeyModifiers::CONTROL)),
            Some(Command::TopKUp)
        );
    }

    #[test]
    fn plain_characters_insert() {
        assert_eq!(
            map_key(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Command::InsertChar('a'))
        );
        // Shifted characters still insert
        assert_eq!(
            map_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Command::InsertChar('A'))
        );
    }

    #[test]
    fn alt_digits_open_retrieval_results() {
        assert_eq!(
            map_key(key(KeyCode::Char('1'), KeyModifiers::ALT)),
            Some(Command::OpenResult(0))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('9'), KeyModifiers::ALT)),
            Some(Command::OpenResult(8))
        );
    }

    #[test]
    fn thread_navigation() {
        assert_eq!(
            map_key(key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Command::NextThread)
        );
        assert_eq!(
            map_key(key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Command::PrevThread)
        );
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Command::GoToRetrieval)
        );
    }
}
