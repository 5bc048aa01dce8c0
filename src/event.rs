//! Keyboard event handling for the viewer.
//!
//! - printable characters / backspace: edit the identifier input
//! - `Enter`: validate the identifier and refresh the panels
//! - `Esc` or `Ctrl+C`: quit (global)
//! - any key while the alert is visible: dismiss it early

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::AppState;

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Add a character to the input buffer
    InputChar(char),
    /// Remove the last character from the input buffer
    InputBackspace,
    /// Validate the entered identifier
    Submit,
    /// Dismiss the "not found" alert
    DismissAlert,
}

/// Polls for an event with a timeout.
///
/// Returns `None` if no event occurred within the timeout; the caller's
/// tick still runs, which is what keeps the alert deadline moving.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event into an [`Action`].
pub fn handle_event(event: Event, alert_active: bool) -> Action {
    match event {
        Event::Key(key) => handle_key_event(key, alert_active),
        _ => Action::None,
    }
}

fn handle_key_event(key: KeyEvent, alert_active: bool) -> Action {
    // Key releases would double every keystroke on Windows terminals
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // Quit works everywhere, alert or not
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if key.code == KeyCode::Esc {
        return Action::Quit;
    }

    if alert_active {
        return Action::DismissAlert;
    }

    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
pub fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::None => {}
        Action::Quit => state.should_quit = true,
        Action::InputChar(c) => state.input_char(c),
        Action::InputBackspace => state.input_backspace(),
        Action::Submit => state.submit(),
        Action::DismissAlert => state.dismiss_alert(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_printable_chars_edit_input() {
        assert_eq!(handle_event(key(KeyCode::Char('a')), false), Action::InputChar('a'));
        assert_eq!(handle_event(key(KeyCode::Backspace), false), Action::InputBackspace);
    }

    #[test]
    fn test_enter_submits() {
        assert_eq!(handle_event(key(KeyCode::Enter), false), Action::Submit);
    }

    #[test]
    fn test_esc_quits_globally() {
        assert_eq!(handle_event(key(KeyCode::Esc), false), Action::Quit);
        assert_eq!(handle_event(key(KeyCode::Esc), true), Action::Quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert_eq!(handle_event(event, false), Action::Quit);
    }

    #[test]
    fn test_any_key_dismisses_alert() {
        assert_eq!(handle_event(key(KeyCode::Char('x')), true), Action::DismissAlert);
        assert_eq!(handle_event(key(KeyCode::Enter), true), Action::DismissAlert);
    }

    #[test]
    fn test_release_events_ignored() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(handle_event(event, false), Action::None);
    }
}
