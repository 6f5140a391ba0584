//! Editor command types used by dispatch and clients.

use std::{
  fmt,
  str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
  InsertChar(char),
  InsertNewline,
  DeleteBackward,
  DeleteForward,
  DeleteToLineEnd,
  DeleteFromLineStart,
  Move(Direction),
  LineStart,
  LineEnd,
  PageUp,
  PageDown,
  ToggleSelection,
  Copy,
  Cut,
  Paste,
  Undo,
  Redo,
  Find,
  Save,
  SaveAs,
  OpenFile,
  NewBuffer,
  CloseBuffer,
  NextBuffer,
  PrevBuffer,
  ShowHelp,
  Redraw,
  Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl Command {
  /// Every command that can be bound by name, in help-listing order.
  pub const NAMED: &'static [Command] = &[
    Command::ToggleSelection,
    Command::LineStart,
    Command::NewBuffer,
    Command::Copy,
    Command::CloseBuffer,
    Command::LineEnd,
    Command::Find,
    Command::ShowHelp,
    Command::DeleteToLineEnd,
    Command::Redraw,
    Command::NextBuffer,
    Command::OpenFile,
    Command::PrevBuffer,
    Command::Quit,
    Command::Redo,
    Command::Save,
    Command::DeleteFromLineStart,
    Command::Paste,
    Command::SaveAs,
    Command::Cut,
    Command::Undo,
    Command::InsertNewline,
    Command::Move(Direction::Up),
    Command::Move(Direction::Down),
    Command::Move(Direction::Left),
    Command::Move(Direction::Right),
    Command::PageDown,
    Command::PageUp,
    Command::DeleteBackward,
    Command::DeleteForward,
  ];

  /// Stable name used in config files. `InsertChar` has none.
  pub fn name(&self) -> Option<&'static str> {
    let name = match self {
      Command::InsertChar(_) => return None,
      Command::InsertNewline => "insert_newline",
      Command::DeleteBackward => "delete_backward",
      Command::DeleteForward => "delete_forward",
      Command::DeleteToLineEnd => "delete_to_line_end",
      Command::DeleteFromLineStart => "delete_from_line_start",
      Command::Move(Direction::Up) => "move_up",
      Command::Move(Direction::Down) => "move_down",
      Command::Move(Direction::Left) => "move_left",
      Command::Move(Direction::Right) => "move_right",
      Command::LineStart => "line_start",
      Command::LineEnd => "line_end",
      Command::PageUp => "page_up",
      Command::PageDown => "page_down",
      Command::ToggleSelection => "toggle_selection",
      Command::Copy => "copy",
      Command::Cut => "cut",
      Command::Paste => "paste",
      Command::Undo => "undo",
      Command::Redo => "redo",
      Command::Find => "find",
      Command::Save => "save",
      Command::SaveAs => "save_as",
      Command::OpenFile => "open_file",
      Command::NewBuffer => "new_buffer",
      Command::CloseBuffer => "close_buffer",
      Command::NextBuffer => "next_buffer",
      Command::PrevBuffer => "prev_buffer",
      Command::ShowHelp => "show_help",
      Command::Redraw => "redraw",
      Command::Quit => "quit",
    };
    Some(name)
  }

  pub fn description(&self) -> &'static str {
    match self {
      Command::InsertChar(_) => "insert character",
      Command::InsertNewline => "insert new line",
      Command::DeleteBackward => "delete character left from cursor",
      Command::DeleteForward => "delete character right from cursor",
      Command::DeleteToLineEnd => "delete text to end of line",
      Command::DeleteFromLineStart => "delete text from beginning of line",
      Command::Move(Direction::Up) => "go to previous line",
      Command::Move(Direction::Down) => "go to next line",
      Command::Move(Direction::Left) => "go to previous character",
      Command::Move(Direction::Right) => "go to next character",
      Command::LineStart => "go to beginning of line",
      Command::LineEnd => "go to end of line",
      Command::PageUp => "go to previous page",
      Command::PageDown => "go to next page",
      Command::ToggleSelection => "start/stop selecting text",
      Command::Copy => "copy selected text to clipboard",
      Command::Cut => "cut selected text to clipboard",
      Command::Paste => "paste text from clipboard",
      Command::Undo => "undo last change",
      Command::Redo => "redo previously undone change",
      Command::Find => "find text",
      Command::Save => "save file",
      Command::SaveAs => "save file as",
      Command::OpenFile => "open file in new buffer",
      Command::NewBuffer => "create new buffer",
      Command::CloseBuffer => "close current buffer",
      Command::NextBuffer => "go to next file",
      Command::PrevBuffer => "go to previous file",
      Command::ShowHelp => "show help",
      Command::Redraw => "redraw screen",
      Command::Quit => "quit",
    }
  }
}

impl FromStr for Command {
  type Err = UnknownCommand;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let name = s.trim();
    Command::NAMED
      .iter()
      .copied()
      .find(|command| command.name() == Some(name))
      .ok_or_else(|| UnknownCommand(name.to_string()))
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Command::InsertChar(c) => write!(f, "insert {c:?}"),
      command => f.write_str(command.name().unwrap_or_default()),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn names_round_trip() {
    for command in Command::NAMED {
      let name = command.name().unwrap();
      assert_eq!(name.parse::<Command>().unwrap(), *command);
    }
  }

  #[test]
  fn unknown_name() {
    assert_eq!(
      "frobnicate".parse::<Command>(),
      Err(UnknownCommand("frobnicate".into()))
    );
  }
}
