//! Input handling - maps crossterm key events onto the-lib's key events.

use crossterm::event::{
  KeyCode,
  KeyEvent as CrosstermKeyEvent,
  KeyModifiers,
};
use the_lib::keymap::{
  Key,
  KeyEvent,
  Modifiers,
};

pub fn to_key_event(event: CrosstermKeyEvent) -> KeyEvent {
  KeyEvent {
    key:       to_key(event.code),
    modifiers: to_modifiers(event.modifiers),
  }
}

fn to_key(code: KeyCode) -> Key {
  match code {
    KeyCode::Char(c) => Key::Char(c),
    KeyCode::Enter => Key::Enter,
    KeyCode::Tab => Key::Tab,
    KeyCode::Esc => Key::Escape,
    KeyCode::Backspace => Key::Backspace,
    KeyCode::Delete => Key::Delete,
    KeyCode::Home => Key::Home,
    KeyCode::End => Key::End,
    KeyCode::PageUp => Key::PageUp,
    KeyCode::PageDown => Key::PageDown,
    KeyCode::Left => Key::Left,
    KeyCode::Right => Key::Right,
    KeyCode::Up => Key::Up,
    KeyCode::Down => Key::Down,
    _ => Key::Other,
  }
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
  let mut out = Modifiers::empty();
  if modifiers.contains(KeyModifiers::CONTROL) {
    out.insert(Modifiers::CTRL);
  }
  if modifiers.contains(KeyModifiers::ALT) {
    out.insert(Modifiers::ALT);
  }
  if modifiers.contains(KeyModifiers::SHIFT) {
    out.insert(Modifiers::SHIFT);
  }
  out
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyEventKind;
  use the_lib::{
    command::Command,
    keymap::Keymap,
  };

  use super::*;

  #[test]
  fn ctrl_keys_reach_the_keymap() {
    let event = CrosstermKeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(event.kind, KeyEventKind::Press);
    let event = to_key_event(event);
    assert!(event.modifiers.ctrl());
    assert_eq!(Keymap::default().lookup(&event), Some(Command::Save));
  }

  #[test]
  fn unknown_keys_map_to_other() {
    let event = to_key_event(CrosstermKeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
    assert_eq!(event.key, Key::Other);
    assert_eq!(Keymap::default().lookup(&event), None);
  }
}
