//! Event Handling - Keyboard input mapped to session commands

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Command;

/// Map a terminal event to a command; `None` for everything unbound
pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(*key),
        _ => None,
    }
}

/// Handle keyboard events
pub fn map_key(key: KeyEvent) -> Option<Command> {
    // Quit: q, Q, Esc or Ctrl+C
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(Command::Quit),
        (_, KeyCode::Char('q')) | (_, KeyCode::Char('Q')) | (_, KeyCode::Esc) => {
            return Some(Command::Quit)
        }
        _ => {}
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Command::MoveDown,
        KeyCode::Right | KeyCode::Char('l') => Command::Expand,
        KeyCode::Left | KeyCode::Char('h') => Command::Collapse,
        KeyCode::Char(' ') | KeyCode::Enter => Command::Toggle,
        KeyCode::Char('e') => Command::ExpandAll,
        KeyCode::Char('c') => Command::CollapseAll,
        KeyCode::Char('s') | KeyCode::Char('S') => Command::ToggleStatusPanel,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::Home => Command::Home,
        KeyCode::End => Command::End,
        _ => return None,
    };
    Some(command)
}
