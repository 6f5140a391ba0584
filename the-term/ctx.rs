//! Application state for the terminal client.

use the_lib::{
  command::Command,
  config::Config,
  editor::{
    CommandOutcome,
    Editor,
  },
  keymap::{
    KeyEvent,
    Keymap,
  },
};

use crate::{
  prompt::TerminalPrompt,
  terminal::Terminal,
};

/// First visible line and display column of the active buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scroll {
  pub row: usize,
  pub col: usize,
}

pub struct Ctx {
  pub editor:       Editor,
  pub keymap:       Keymap,
  pub config:       Config,
  /// Scroll of the active buffer, reset when another buffer becomes active.
  pub scroll:       Scroll,
  scrolled_buffer:  usize,
  pub show_help:    bool,
  pub should_quit:  bool,
  pub needs_render: bool,
}

impl Ctx {
  pub fn new(editor: Editor, keymap: Keymap, config: Config) -> Self {
    Self {
      editor,
      keymap,
      config,
      scroll: Scroll::default(),
      scrolled_buffer: 0,
      show_help: false,
      should_quit: false,
      needs_render: true,
    }
  }

  pub fn handle_key(&mut self, terminal: &mut Terminal, event: KeyEvent) {
    self.needs_render = true;
    if self.show_help {
      self.show_help = false;
      return;
    }

    self.editor.messages_mut().dismiss_active();
    let Some(command) = self.keymap.lookup(&event) else {
      tracing::trace!("unbound key {event:?}");
      return;
    };
    self.execute(terminal, command);
  }

  pub fn execute(&mut self, terminal: &mut Terminal, command: Command) {
    let mut prompt = TerminalPrompt::new(terminal);
    let outcome = self.editor.execute(command, &mut prompt);
    let repaint = prompt.was_used();

    if repaint || outcome == CommandOutcome::Redraw {
      if let Err(err) = terminal.clear() {
        tracing::warn!("failed to clear terminal: {err}");
      }
    }

    match outcome {
      CommandOutcome::Done | CommandOutcome::Redraw => {},
      CommandOutcome::ShowHelp => self.show_help = true,
      CommandOutcome::Quit => self.should_quit = true,
    }

    if self.editor.active_index() != self.scrolled_buffer {
      self.scrolled_buffer = self.editor.active_index();
      self.scroll = Scroll::default();
    }
  }

  /// Keep the cursor inside a `height` x `width` text area, honouring the
  /// configured scroll margin.
  pub fn ensure_cursor_visible(&mut self, height: usize, width: usize, cursor_col: usize) {
    let cursor = self.editor.buffer().cursor();
    let margin = self
      .config
      .editor
      .scroll_margin
      .min(height.saturating_sub(1) / 2);

    if cursor.row < self.scroll.row + margin {
      self.scroll.row = cursor.row.saturating_sub(margin);
    } else if cursor.row + margin >= self.scroll.row + height {
      self.scroll.row = cursor.row + margin + 1 - height;
    }

    if cursor_col < self.scroll.col {
      self.scroll.col = cursor_col;
    } else if cursor_col >= self.scroll.col + width {
      self.scroll.col = cursor_col + 1 - width;
    }
  }
}
