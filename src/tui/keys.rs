//! Key bindings for both selection phases

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::selection::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Review,
    Browse,
}

/// What a key press means before it reaches the selection state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select(Event),
    ToggleHelp,
}

pub fn map_key(key: KeyEvent, phase: PhaseKind) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Select(Event::Cancel)),
            KeyCode::Char('d') => Some(Action::Select(Event::PageDown)),
            KeyCode::Char('u') => Some(Action::Select(Event::PageUp)),
            _ => None,
        };
    }

    let event = match key.code {
        KeyCode::Char('?') => return Some(Action::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => Event::Up,
        KeyCode::Down | KeyCode::Char('j') => Event::Down,
        KeyCode::Home | KeyCode::Char('g') => Event::Home,
        KeyCode::End | KeyCode::Char('G') => Event::End,
        KeyCode::Char(' ') => Event::Toggle,
        KeyCode::Enter => Event::Confirm,
        KeyCode::Esc | KeyCode::Char('q') => Event::Cancel,
        code => match (phase, code) {
            (PhaseKind::Review, KeyCode::Char('a')) => Event::SelectAll,
            (PhaseKind::Review, KeyCode::Char('n')) => Event::DeselectAll,
            (PhaseKind::Browse, KeyCode::PageUp) => Event::PageUp,
            (PhaseKind::Browse, KeyCode::PageDown) => Event::PageDown,
            (PhaseKind::Browse, KeyCode::Right | KeyCode::Char('l')) => Event::Expand,
            (PhaseKind::Browse, KeyCode::Left | KeyCode::Char('h')) => Event::Collapse,
            _ => return None,
        },
    };

    Some(Action::Select(event))
}
