use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use log::{debug, warn};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Always handled first
    ForceQuit,
    Resize,

    // Text editing (InputBox, tool form)
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    Submit,
    Escape,
    NextField,

    // Conversation viewport
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,

    // Session shortcuts
    OpenDirectory, // Ctrl+O
    OpenTools,     // Ctrl+T
    NewChat,       // Ctrl+N
    CloseTab,      // Ctrl+W
    ClearHistory,  // Ctrl+L
    Reload,        // Ctrl+R
    NextTab,       // Alt+Right
    PrevTab,       // Alt+Left
    MoveTabRight,  // Alt+Shift+Right
    MoveTabLeft,   // Alt+Shift+Left

    // Local view toggles
    ToggleGrid,  // Ctrl+G
    ToggleInput, // Ctrl+E
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

/// Map a raw crossterm event to a `TuiEvent`. Key releases are dropped.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => translate_key(key),
        Event::Key(_) => None,
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<TuiEvent> {
    debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    let alt_shift = KeyModifiers::ALT | KeyModifiers::SHIFT;
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(TuiEvent::OpenDirectory),
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(TuiEvent::OpenTools),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(TuiEvent::NewChat),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => Some(TuiEvent::CloseTab),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(TuiEvent::ClearHistory),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(TuiEvent::Reload),
        (KeyModifiers::CONTROL, KeyCode::Char('g')) => Some(TuiEvent::ToggleGrid),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => Some(TuiEvent::ToggleInput),
        // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
        (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
        (m, KeyCode::Right) if m == alt_shift => Some(TuiEvent::MoveTabRight),
        (m, KeyCode::Left) if m == alt_shift => Some(TuiEvent::MoveTabLeft),
        (KeyModifiers::ALT, KeyCode::Right) => Some(TuiEvent::NextTab),
        (KeyModifiers::ALT, KeyCode::Left) => Some(TuiEvent::PrevTab),
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => None,
        (m, KeyCode::Enter) if m.contains(KeyModifiers::SHIFT) => {
            Some(TuiEvent::InputChar('\n'))
        }
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => Some(TuiEvent::NextField),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
        (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_control_shortcuts() {
        let cases = [
            ('c', TuiEvent::ForceQuit),
            ('o', TuiEvent::OpenDirectory),
            ('t', TuiEvent::OpenTools),
            ('n', TuiEvent::NewChat),
            ('w', TuiEvent::CloseTab),
            ('g', TuiEvent::ToggleGrid),
            ('e', TuiEvent::ToggleInput),
            ('j', TuiEvent::InputChar('\n')),
        ];
        for (c, expected) in cases {
            assert_eq!(
                translate(key(KeyCode::Char(c), KeyModifiers::CONTROL)),
                Some(expected)
            );
        }
    }

    #[test]
    fn test_unbound_control_chars_are_swallowed() {
        assert_eq!(translate(key(KeyCode::Char('z'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_tab_navigation_keys() {
        assert_eq!(
            translate(key(KeyCode::Right, KeyModifiers::ALT)),
            Some(TuiEvent::NextTab)
        );
        assert_eq!(
            translate(key(KeyCode::Left, KeyModifiers::ALT | KeyModifiers::SHIFT)),
            Some(TuiEvent::MoveTabLeft)
        );
        assert_eq!(
            translate(key(KeyCode::Left, KeyModifiers::NONE)),
            Some(TuiEvent::CursorLeft)
        );
    }

    #[test]
    fn test_plain_typing_and_enter() {
        assert_eq!(
            translate(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('A'))
        );
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('\n'))
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(Event::Mouse(wheel)), Some(TuiEvent::ScrollUp));
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
