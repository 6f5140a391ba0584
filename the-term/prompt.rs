//! Bottom-line prompts with their own input loop.

use crossterm::event::{
  self,
  Event,
  KeyEventKind,
};
use the_lib::{
  keymap::{
    Key,
    KeyEvent,
  },
  prompt::Prompt,
};
use unicode_width::UnicodeWidthStr;

use crate::{
  input::to_key_event,
  terminal::Terminal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
  Continue,
  Confirm(String),
  Cancel,
}

/// Single-line text input with emacs-style editing keys.
#[derive(Debug, Default, Clone)]
pub struct LineInput {
  chars:  Vec<char>,
  cursor: usize,
}

impl LineInput {
  pub fn new(initial: &str) -> Self {
    let chars: Vec<char> = initial.chars().collect();
    let cursor = chars.len();
    Self { chars, cursor }
  }

  pub fn text(&self) -> String {
    self.chars.iter().collect()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn handle(&mut self, event: KeyEvent) -> InputAction {
    let ctrl = event.modifiers.ctrl();
    match event.key {
      Key::Enter => return InputAction::Confirm(self.text()),
      Key::Escape => return InputAction::Cancel,
      Key::Char('g') if ctrl => return InputAction::Cancel,
      Key::Char('a') if ctrl => self.cursor = 0,
      Key::Char('e') if ctrl => self.cursor = self.chars.len(),
      Key::Char('u') if ctrl => {
        self.chars.drain(..self.cursor);
        self.cursor = 0;
      },
      Key::Char('k') if ctrl => self.chars.truncate(self.cursor),
      Key::Char(c) if !ctrl && !event.modifiers.alt() => {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
      },
      Key::Home => self.cursor = 0,
      Key::End => self.cursor = self.chars.len(),
      Key::Left => self.cursor = self.cursor.saturating_sub(1),
      Key::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
      Key::Backspace if self.cursor > 0 => {
        self.cursor -= 1;
        self.chars.remove(self.cursor);
      },
      Key::Delete if self.cursor < self.chars.len() => {
        self.chars.remove(self.cursor);
      },
      _ => {},
    }
    InputAction::Continue
  }
}

/// [`Prompt`] that takes over the bottom terminal line until answered.
pub struct TerminalPrompt<'a> {
  terminal: &'a mut Terminal,
  used:     bool,
}

impl<'a> TerminalPrompt<'a> {
  pub fn new(terminal: &'a mut Terminal) -> Self {
    Self {
      terminal,
      used: false,
    }
  }

  /// Whether the screen was painted outside of ratatui and needs a full
  /// repaint.
  pub fn was_used(&self) -> bool {
    self.used
  }

  fn next_key(&mut self) -> Option<KeyEvent> {
    loop {
      match event::read() {
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(to_key_event(key)),
        Ok(Event::Resize(width, height)) => {
          if let Err(err) = self.terminal.resize(width, height) {
            tracing::warn!("resize during prompt failed: {err}");
          }
          return Some(KeyEvent::plain(Key::Other));
        },
        Ok(_) => {},
        Err(err) => {
          tracing::warn!("failed to read input: {err}");
          return None;
        },
      }
    }
  }

  fn draw(&mut self, label: &str, input: &LineInput) -> bool {
    let text = input.text();
    let before: String = text.chars().take(input.cursor()).collect();
    let cursor_col = label.width() + before.width();
    let line = format!("{label}{text}");
    self.used = true;
    match self
      .terminal
      .draw_bottom_line(&line, u16::try_from(cursor_col).unwrap_or(u16::MAX))
    {
      Ok(()) => true,
      Err(err) => {
        tracing::warn!("failed to draw prompt: {err}");
        false
      },
    }
  }
}

impl Prompt for TerminalPrompt<'_> {
  fn read_string(&mut self, label: &str, initial: &str) -> Option<String> {
    let mut input = LineInput::new(initial);
    loop {
      if !self.draw(label, &input) {
        return None;
      }
      let key = self.next_key()?;
      match input.handle(key) {
        InputAction::Continue => {},
        InputAction::Confirm(text) => return Some(text),
        InputAction::Cancel => return None,
      }
    }
  }

  fn query(&mut self, label: &str, answers: &[char]) -> Option<char> {
    let empty = LineInput::default();
    loop {
      if !self.draw(label, &empty) {
        return None;
      }
      let key = self.next_key()?;
      match key.key {
        Key::Escape => return None,
        Key::Char('g') if key.modifiers.ctrl() => return None,
        Key::Char(c) if answers.contains(&c.to_ascii_lowercase()) => {
          return Some(c.to_ascii_lowercase());
        },
        _ => {},
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use the_lib::keymap::Modifiers;

  use super::*;

  fn key(key: Key) -> KeyEvent {
    KeyEvent::plain(key)
  }

  fn feed(input: &mut LineInput, text: &str) {
    for c in text.chars() {
      assert_eq!(input.handle(key(Key::Char(c))), InputAction::Continue);
    }
  }

  #[test]
  fn typing_and_confirming() {
    let mut input = LineInput::new("foo");
    assert_eq!(input.cursor(), 3);
    feed(&mut input, "bar");
    assert_eq!(
      input.handle(key(Key::Enter)),
      InputAction::Confirm("foobar".into())
    );
  }

  #[test]
  fn editing_keys() {
    let mut input = LineInput::new("hello world");
    input.handle(KeyEvent::ctrl('a'));
    input.handle(key(Key::Delete));
    assert_eq!(input.text(), "ello world");

    input.handle(key(Key::Right));
    input.handle(key(Key::Right));
    input.handle(key(Key::Right));
    input.handle(KeyEvent::ctrl('k'));
    assert_eq!(input.text(), "ell");

    input.handle(key(Key::Backspace));
    input.handle(KeyEvent::ctrl('e'));
    feed(&mut input, "!");
    assert_eq!(input.text(), "el!");

    input.handle(key(Key::Left));
    input.handle(KeyEvent::ctrl('u'));
    assert_eq!(input.text(), "!");
    assert_eq!(input.cursor(), 0);
  }

  #[test]
  fn cancelling() {
    let mut input = LineInput::new("x");
    assert_eq!(input.handle(key(Key::Escape)), InputAction::Cancel);
    assert_eq!(input.handle(KeyEvent::ctrl('g')), InputAction::Cancel);
  }

  #[test]
  fn alt_chords_do_not_insert() {
    let mut input = LineInput::new("");
    let mut modifiers = Modifiers::empty();
    modifiers.insert(Modifiers::ALT);
    input.handle(KeyEvent {
      key: Key::Char('x'),
      modifiers,
    });
    assert_eq!(input.text(), "");
  }
}
