//! The editor owns every open buffer, the shared clipboard and the status
//! messages, and runs [`Command`]s against them.
//!
//! Terminal I/O stays outside of the-lib: commands that need to ask the user
//! something go through the [`Prompt`] they are handed.

use std::path::PathBuf;

use crate::{
  buffer::Buffer,
  clipboard::Clipboard,
  command::Command,
  file,
  messages::MessageCenter,
  prompt::Prompt,
};

pub const DEFAULT_PAGE_HEIGHT: usize = 20;

/// What the client should do once a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
  Done,
  ShowHelp,
  Redraw,
  Quit,
}

#[derive(Debug)]
pub struct Editor {
  buffers:     Vec<Buffer>,
  active:      usize,
  clipboard:   Clipboard,
  messages:    MessageCenter,
  page_height: usize,
}

impl Default for Editor {
  fn default() -> Self {
    Self::new()
  }
}

impl Editor {
  /// An editor with a single empty buffer.
  pub fn new() -> Self {
    Self::with_buffers(Vec::new())
  }

  pub fn with_buffers(mut buffers: Vec<Buffer>) -> Self {
    if buffers.is_empty() {
      buffers.push(Buffer::new());
    }
    Self {
      buffers,
      active: 0,
      clipboard: Clipboard::new(),
      messages: MessageCenter::default(),
      page_height: DEFAULT_PAGE_HEIGHT,
    }
  }

  pub fn buffer_count(&self) -> usize {
    self.buffers.len()
  }

  pub fn active_index(&self) -> usize {
    self.active
  }

  pub fn buffer(&self) -> &Buffer {
    &self.buffers[self.active]
  }

  pub fn buffer_mut(&mut self) -> &mut Buffer {
    &mut self.buffers[self.active]
  }

  pub fn buffers(&self) -> &[Buffer] {
    &self.buffers
  }

  pub fn set_active(&mut self, index: usize) -> bool {
    if index >= self.buffers.len() {
      return false;
    }
    self.active = index;
    true
  }

  pub fn clipboard(&self) -> &Clipboard {
    &self.clipboard
  }

  pub fn messages(&self) -> &MessageCenter {
    &self.messages
  }

  pub fn messages_mut(&mut self) -> &mut MessageCenter {
    &mut self.messages
  }

  pub fn page_height(&self) -> usize {
    self.page_height
  }

  /// Lines moved by page up/down; the client sets this from its viewport.
  pub fn set_page_height(&mut self, height: usize) {
    self.page_height = height.max(1);
  }

  pub fn any_modified(&self) -> bool {
    self.buffers.iter().any(Buffer::is_modified)
  }

  /// Add `buffer` and make it active.
  pub fn push_buffer(&mut self, buffer: Buffer) -> usize {
    self.buffers.push(buffer);
    self.active = self.buffers.len() - 1;
    self.active
  }

  /// Load `path` into a new active buffer.
  pub fn open(&mut self, path: impl Into<PathBuf>) -> file::Result<usize> {
    let buffer = Buffer::open(path)?;
    Ok(self.push_buffer(buffer))
  }

  pub fn next_buffer(&mut self) {
    self.active = (self.active + 1) % self.buffers.len();
  }

  pub fn prev_buffer(&mut self) {
    let len = self.buffers.len();
    self.active = (self.active + len - 1) % len;
  }

  pub fn execute(&mut self, command: Command, prompt: &mut dyn Prompt) -> CommandOutcome {
    tracing::trace!("executing {command}");
    let page_height = self.page_height;

    match command {
      Command::InsertChar(c) => self.buffer_mut().insert_char(c),
      Command::InsertNewline => self.buffer_mut().insert_newline(),
      Command::DeleteBackward => {
        self.buffer_mut().delete_backward();
      },
      Command::DeleteForward => {
        self.buffer_mut().delete_forward();
      },
      Command::DeleteToLineEnd => {
        self.buffer_mut().delete_to_line_end();
      },
      Command::DeleteFromLineStart => {
        self.buffer_mut().delete_from_line_start();
      },
      Command::Move(direction) => self.buffer_mut().move_cursor(direction),
      Command::LineStart => self.buffer_mut().move_to_line_start(),
      Command::LineEnd => self.buffer_mut().move_to_line_end(),
      Command::PageUp => self.buffer_mut().page_up(page_height),
      Command::PageDown => self.buffer_mut().page_down(page_height),
      Command::ToggleSelection => self.buffer_mut().toggle_selection(),
      Command::Copy => {
        match self.buffer_mut().copy() {
          Some(text) => self.clipboard.set(text),
          None => {
            self.messages.warning("no text selected");
          },
        }
      },
      Command::Cut => {
        match self.buffer_mut().cut() {
          Some(text) => self.clipboard.set(text),
          None => {
            self.messages.warning("no text selected");
          },
        }
      },
      Command::Paste => {
        if let Some(text) = self.clipboard.get() {
          let text = text.to_vec();
          self.buffer_mut().paste(&text);
        }
      },
      Command::Undo => {
        if let Err(err) = self.buffer_mut().undo() {
          self.messages.info(err.to_string());
        }
      },
      Command::Redo => {
        if let Err(err) = self.buffer_mut().redo() {
          self.messages.info(err.to_string());
        }
      },
      Command::Find => self.find(prompt),
      Command::Save => {
        self.save(prompt);
      },
      Command::SaveAs => {
        self.save_as(prompt);
      },
      Command::OpenFile => self.open_file(prompt),
      Command::NewBuffer => {
        self.push_buffer(Buffer::new());
      },
      Command::CloseBuffer => self.close_buffer(prompt),
      Command::NextBuffer => self.next_buffer(),
      Command::PrevBuffer => self.prev_buffer(),
      Command::ShowHelp => return CommandOutcome::ShowHelp,
      Command::Redraw => return CommandOutcome::Redraw,
      Command::Quit => return self.quit(prompt),
    }

    CommandOutcome::Done
  }

  fn find(&mut self, prompt: &mut dyn Prompt) {
    let last = self.buffer().search().phrase();
    let Some(phrase) = prompt.read_string("find: ", &last) else {
      return;
    };
    if phrase.is_empty() {
      return;
    }
    if self.buffer_mut().find(&phrase).is_none() {
      self.messages.info(format!("\"{phrase}\" not found"));
    }
  }

  /// Save the active buffer, asking for a path when it has none. Returns
  /// whether the buffer was written.
  fn save(&mut self, prompt: &mut dyn Prompt) -> bool {
    match self.buffer().path().map(|path| path.to_path_buf()) {
      Some(path) => self.write_active(path),
      None => self.save_as(prompt),
    }
  }

  fn save_as(&mut self, prompt: &mut dyn Prompt) -> bool {
    let initial = self
      .buffer()
      .path()
      .map(|path| path.display().to_string())
      .unwrap_or_default();
    let Some(answer) = prompt.read_string("save as: ", &initial) else {
      return false;
    };
    let answer = answer.trim();
    if answer.is_empty() {
      return false;
    }

    let path = PathBuf::from(answer);
    let rebinding = self.buffer().path() != Some(path.as_path());
    if rebinding && path.exists() {
      let answer = prompt.query("file exists, overwrite? (y/n) ", &['y', 'n']);
      if answer != Some('y') {
        return false;
      }
    }
    self.write_active(path)
  }

  fn write_active(&mut self, path: PathBuf) -> bool {
    match self.buffer_mut().save_to(&path) {
      Ok(()) => {
        self.messages.info(format!("saved {}", path.display()));
        true
      },
      Err(err) => {
        self.messages.error(err.to_string());
        false
      },
    }
  }

  fn open_file(&mut self, prompt: &mut dyn Prompt) {
    let Some(answer) = prompt.read_string("open file: ", "") else {
      return;
    };
    let answer = answer.trim();
    if answer.is_empty() {
      return;
    }
    if let Err(err) = self.open(answer) {
      self.messages.error(err.to_string());
    }
  }

  /// Ask whether to save the modified active buffer. Returns `false` when the
  /// caller should abort: the user cancelled or the save failed.
  fn confirm_discard(&mut self, prompt: &mut dyn Prompt) -> bool {
    if !self.buffer().is_modified() {
      return true;
    }
    let label = format!("save {}? (y/n/c) ", self.buffer().display_name());
    match prompt.query(&label, &['y', 'n', 'c']) {
      Some('y') => self.save(prompt),
      Some('n') => true,
      _ => false,
    }
  }

  fn close_buffer(&mut self, prompt: &mut dyn Prompt) {
    if self.buffers.len() == 1 {
      self.messages.warning("cannot close the last buffer");
      return;
    }
    if !self.confirm_discard(prompt) {
      return;
    }
    let closed = self.buffers.remove(self.active);
    tracing::debug!("closed {}", closed.display_name());
    self.active = self.active.min(self.buffers.len() - 1);
  }

  fn quit(&mut self, prompt: &mut dyn Prompt) -> CommandOutcome {
    for index in 0..self.buffers.len() {
      if !self.buffers[index].is_modified() {
        continue;
      }
      self.active = index;
      if !self.confirm_discard(prompt) {
        return CommandOutcome::Done;
      }
    }
    CommandOutcome::Quit
  }
}
