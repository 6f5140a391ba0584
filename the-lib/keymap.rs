//! Input event types and the key-to-command table.
//!
//! Clients translate their native key events into [`KeyEvent`] and ask the
//! [`Keymap`] which [`Command`] to run. Unbound printable characters insert
//! themselves.

use std::{
  collections::HashMap,
  fmt,
  str::FromStr,
};

use thiserror::Error;

use crate::command::{
  Command,
  Direction,
  UnknownCommand,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeymapError {
  #[error("invalid key binding '{binding}': {reason}")]
  Binding { binding: String, reason: String },
  #[error(transparent)]
  Command(#[from] UnknownCommand),
}

pub type Result<T> = std::result::Result<T, KeymapError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
  bits: u8,
}

impl Modifiers {
  pub const CTRL: u8 = 0b0000_0001;
  pub const ALT: u8 = 0b0000_0010;
  pub const SHIFT: u8 = 0b0000_0100;

  #[must_use]
  pub const fn empty() -> Self {
    Self { bits: 0 }
  }

  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.bits == 0
  }

  #[must_use]
  pub const fn ctrl(self) -> bool {
    (self.bits & Self::CTRL) != 0
  }

  #[must_use]
  pub const fn alt(self) -> bool {
    (self.bits & Self::ALT) != 0
  }

  #[must_use]
  pub const fn shift(self) -> bool {
    (self.bits & Self::SHIFT) != 0
  }

  pub fn insert(&mut self, bits: u8) {
    self.bits |= bits;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  Escape,
  Backspace,
  Tab,
  Delete,
  Home,
  End,
  PageUp,
  PageDown,
  Left,
  Right,
  Up,
  Down,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub const fn plain(key: Key) -> Self {
    Self {
      key,
      modifiers: Modifiers::empty(),
    }
  }

  pub fn ctrl(c: char) -> Self {
    let mut modifiers = Modifiers::empty();
    modifiers.insert(Modifiers::CTRL);
    Self {
      key: Key::Char(c),
      modifiers,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code:  Key,
  pub shift: bool,
  pub ctrl:  bool,
  pub alt:   bool,
}

impl KeyBinding {
  pub const fn new(code: Key) -> Self {
    Self {
      code,
      shift: false,
      ctrl: false,
      alt: false,
    }
  }

  pub const fn ctrl(c: char) -> Self {
    Self {
      code:  Key::Char(c),
      shift: false,
      ctrl:  true,
      alt:   false,
    }
  }

  pub fn from_key_event(event: &KeyEvent) -> Self {
    // Letters arrive upper-cased with shift held on some terminals.
    let code = match event.key {
      Key::Char(c) if event.modifiers.ctrl() => Key::Char(c.to_ascii_lowercase()),
      key => key,
    };
    Self {
      code,
      shift: event.modifiers.shift() && !matches!(code, Key::Char(_)),
      ctrl: event.modifiers.ctrl(),
      alt: event.modifiers.alt(),
    }
  }
}

impl fmt::Display for KeyBinding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.ctrl {
      f.write_str("C-")?;
    }
    if self.alt {
      f.write_str("A-")?;
    }
    if self.shift {
      f.write_str("S-")?;
    }

    match self.code {
      Key::Char(' ') => f.write_str("space"),
      Key::Char('-') => f.write_str("minus"),
      Key::Char(c) => write!(f, "{c}"),
      Key::Enter => f.write_str("ret"),
      Key::Escape => f.write_str("esc"),
      Key::Backspace => f.write_str("bs"),
      Key::Tab => f.write_str("tab"),
      Key::Delete => f.write_str("del"),
      Key::Home => f.write_str("home"),
      Key::End => f.write_str("end"),
      Key::PageUp => f.write_str("pgup"),
      Key::PageDown => f.write_str("pgdown"),
      Key::Left => f.write_str("left"),
      Key::Right => f.write_str("right"),
      Key::Up => f.write_str("up"),
      Key::Down => f.write_str("down"),
      Key::Other => f.write_str("other"),
    }
  }
}

impl FromStr for KeyBinding {
  type Err = KeymapError;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = |reason: String| {
      KeymapError::Binding {
        binding: s.to_string(),
        reason,
      }
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(invalid("empty key literal".into()));
    }
    if trimmed == "-" {
      return Ok(KeyBinding::new(Key::Char('-')));
    }

    let mut tokens: Vec<_> = trimmed.split('-').collect();
    let key_token = tokens
      .pop()
      .ok_or_else(|| invalid("missing key token".into()))?;

    let mut binding = KeyBinding::new(Key::Other);
    for token in tokens {
      let modifier = token.trim();
      if modifier.is_empty() {
        continue;
      }

      let flag = match modifier.to_ascii_uppercase().as_str() {
        "S" | "SHIFT" => &mut binding.shift,
        "C" | "CTRL" | "CONTROL" => &mut binding.ctrl,
        "A" | "ALT" => &mut binding.alt,
        other => return Err(invalid(format!("invalid key modifier '{other}-'"))),
      };
      if *flag {
        return Err(invalid(format!("repeated key modifier '{modifier}-'")));
      }
      *flag = true;
    }

    binding.code = parse_key_token(key_token).ok_or_else(|| invalid(format!("unknown key '{key_token}'")))?;
    Ok(binding)
  }
}

fn parse_key_token(token: &str) -> Option<Key> {
  let mut chars = token.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    return Some(Key::Char(c));
  }

  let key = match token.to_ascii_lowercase().as_str() {
    "space" => Key::Char(' '),
    "minus" => Key::Char('-'),
    "enter" | "ret" | "return" => Key::Enter,
    "esc" | "escape" => Key::Escape,
    "backspace" | "bs" => Key::Backspace,
    "tab" => Key::Tab,
    "delete" | "del" => Key::Delete,
    "home" => Key::Home,
    "end" => Key::End,
    "pageup" | "pgup" => Key::PageUp,
    "pagedown" | "pgdown" => Key::PageDown,
    "left" => Key::Left,
    "right" => Key::Right,
    "up" => Key::Up,
    "down" => Key::Down,
    _ => return None,
  };
  Some(key)
}

/// Flat table from key binding to command.
#[derive(Debug, Clone)]
pub struct Keymap {
  map:   HashMap<KeyBinding, Command>,
  // Insertion order, for the help listing.
  order: Vec<KeyBinding>,
}

impl Default for Keymap {
  fn default() -> Self {
    let bindings = [
      (KeyBinding::ctrl(' '), Command::ToggleSelection),
      (KeyBinding::ctrl('a'), Command::LineStart),
      (KeyBinding::ctrl('b'), Command::NewBuffer),
      (KeyBinding::ctrl('c'), Command::Copy),
      (KeyBinding::ctrl('d'), Command::CloseBuffer),
      (KeyBinding::ctrl('e'), Command::LineEnd),
      (KeyBinding::ctrl('f'), Command::Find),
      (KeyBinding::ctrl('h'), Command::ShowHelp),
      (KeyBinding::ctrl('k'), Command::DeleteToLineEnd),
      (KeyBinding::ctrl('l'), Command::Redraw),
      (KeyBinding::ctrl('n'), Command::NextBuffer),
      (KeyBinding::ctrl('o'), Command::OpenFile),
      (KeyBinding::ctrl('p'), Command::PrevBuffer),
      (KeyBinding::ctrl('q'), Command::Quit),
      (KeyBinding::ctrl('r'), Command::Redo),
      (KeyBinding::ctrl('s'), Command::Save),
      (KeyBinding::ctrl('u'), Command::DeleteFromLineStart),
      (KeyBinding::ctrl('v'), Command::Paste),
      (KeyBinding::ctrl('w'), Command::SaveAs),
      (KeyBinding::ctrl('x'), Command::Cut),
      (KeyBinding::ctrl('z'), Command::Undo),
      (KeyBinding::new(Key::Enter), Command::InsertNewline),
      (KeyBinding::new(Key::Up), Command::Move(Direction::Up)),
      (KeyBinding::new(Key::Down), Command::Move(Direction::Down)),
      (KeyBinding::new(Key::Left), Command::Move(Direction::Left)),
      (KeyBinding::new(Key::Right), Command::Move(Direction::Right)),
      (KeyBinding::new(Key::Home), Command::LineStart),
      (KeyBinding::new(Key::End), Command::LineEnd),
      (KeyBinding::new(Key::PageDown), Command::PageDown),
      (KeyBinding::new(Key::PageUp), Command::PageUp),
      (KeyBinding::new(Key::Backspace), Command::DeleteBackward),
      (KeyBinding::new(Key::Delete), Command::DeleteForward),
    ];

    let mut keymap = Self::empty();
    for (binding, command) in bindings {
      keymap.bind(binding, command);
    }
    keymap
  }
}

impl Keymap {
  pub fn empty() -> Self {
    Self {
      map:   HashMap::new(),
      order: Vec::new(),
    }
  }

  /// Bind `binding`, replacing any previous command for it.
  pub fn bind(&mut self, binding: KeyBinding, command: Command) {
    if self.map.insert(binding, command).is_none() {
      self.order.push(binding);
    }
  }

  /// Apply `"binding" = "command_name"` overrides, as found in config files.
  pub fn merge_overrides<'a, I>(&mut self, overrides: I) -> Result<()>
  where
    I: IntoIterator<Item = (&'a String, &'a String)>,
  {
    for (binding, command) in overrides {
      let binding: KeyBinding = binding.parse()?;
      let command: Command = command.parse()?;
      tracing::debug!("binding {binding} to {command}");
      self.bind(binding, command);
    }
    Ok(())
  }

  pub fn get(&self, binding: &KeyBinding) -> Option<Command> {
    self.map.get(binding).copied()
  }

  /// Command for `event`: an explicit binding first, then self-insertion of
  /// plain characters and tabs.
  pub fn lookup(&self, event: &KeyEvent) -> Option<Command> {
    if let Some(command) = self.get(&KeyBinding::from_key_event(event)) {
      return Some(command);
    }

    let modifiers = event.modifiers;
    match event.key {
      Key::Char(c) if !modifiers.ctrl() && !modifiers.alt() => Some(Command::InsertChar(c)),
      Key::Tab if !modifiers.ctrl() && !modifiers.alt() => Some(Command::InsertChar('\t')),
      _ => None,
    }
  }

  /// Bindings with their commands, in the order they were first bound.
  pub fn entries(&self) -> impl Iterator<Item = (KeyBinding, Command)> + '_ {
    self
      .order
      .iter()
      .filter_map(|binding| self.map.get(binding).map(|command| (*binding, *command)))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parse_and_display_bindings() {
    let cases = [
      ("C-z", KeyBinding::ctrl('z')),
      ("ctrl-space", KeyBinding::ctrl(' ')),
      ("pgdown", KeyBinding::new(Key::PageDown)),
      ("-", KeyBinding::new(Key::Char('-'))),
    ];
    for (literal, expected) in cases {
      assert_eq!(literal.parse::<KeyBinding>().unwrap(), expected);
    }

    assert_eq!(KeyBinding::ctrl(' ').to_string(), "C-space");
    assert_eq!(KeyBinding::new(Key::Backspace).to_string(), "bs");
  }

  #[test]
  fn reject_bad_bindings() {
    assert!("".parse::<KeyBinding>().is_err());
    assert!("C-C-x".parse::<KeyBinding>().is_err());
    assert!("Q-x".parse::<KeyBinding>().is_err());
    assert!("C-nosuchkey".parse::<KeyBinding>().is_err());
  }

  #[test]
  fn default_lookup() {
    let keymap = Keymap::default();
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('z')), Some(Command::Undo));
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('Z')), Some(Command::Undo));
    assert_eq!(
      keymap.lookup(&KeyEvent::plain(Key::Char('x'))),
      Some(Command::InsertChar('x'))
    );
    assert_eq!(
      keymap.lookup(&KeyEvent::plain(Key::Tab)),
      Some(Command::InsertChar('\t'))
    );
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('g')), None);
    assert_eq!(keymap.lookup(&KeyEvent::plain(Key::Escape)), None);
  }

  #[test]
  fn shifted_characters_insert_themselves() {
    let keymap = Keymap::default();
    let mut modifiers = Modifiers::empty();
    modifiers.insert(Modifiers::SHIFT);
    let event = KeyEvent {
      key: Key::Char('A'),
      modifiers,
    };
    assert_eq!(keymap.lookup(&event), Some(Command::InsertChar('A')));
  }

  #[test]
  fn overrides_replace_and_extend() {
    let mut keymap = Keymap::default();
    let overrides: HashMap<String, String> = [
      ("C-z".to_string(), "redo".to_string()),
      ("C-g".to_string(), "find".to_string()),
    ]
    .into_iter()
    .collect();
    keymap.merge_overrides(&overrides).unwrap();

    assert_eq!(keymap.lookup(&KeyEvent::ctrl('z')), Some(Command::Redo));
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('g')), Some(Command::Find));
    assert_eq!(keymap.entries().filter(|(_, c)| *c == Command::Redo).count(), 2);
  }

  #[test]
  fn bad_override_is_an_error() {
    let mut keymap = Keymap::default();
    let overrides: HashMap<String, String> =
      [("C-z".to_string(), "explode".to_string())].into_iter().collect();
    assert!(matches!(
      keymap.merge_overrides(&overrides),
      Err(KeymapError::Command(_))
    ));
  }
}
