//! Terminal abstraction using ratatui + crossterm backend.

use std::io::{
  self,
  Stdout,
  Write,
};

use crossterm::{
  cursor::MoveTo,
  execute,
  queue,
  style::Print,
  terminal::{
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::Result;
use ratatui::{
  Terminal as RatatuiTerminal,
  backend::CrosstermBackend,
  prelude::Rect,
};

pub struct Terminal {
  terminal: RatatuiTerminal<CrosstermBackend<Stdout>>,
}

impl Terminal {
  pub fn new() -> Result<Self> {
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let terminal = RatatuiTerminal::new(backend)?;
    Ok(Self { terminal })
  }

  pub fn enter_raw_mode(&mut self) -> Result<()> {
    enable_raw_mode()?;
    execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
    Ok(())
  }

  pub fn leave_raw_mode(&mut self) -> Result<()> {
    execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
  }

  pub fn draw<F>(&mut self, f: F) -> Result<()>
  where
    F: for<'a> FnOnce(&mut ratatui::Frame<'a>),
  {
    self.terminal.draw(f)?;
    Ok(())
  }

  pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
    self.terminal.resize(Rect::new(0, 0, width, height))?;
    Ok(())
  }

  pub fn size(&self) -> Result<Rect> {
    let size = self.terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
  }

  /// Forget what is on screen so the next draw repaints every cell.
  pub fn clear(&mut self) -> Result<()> {
    self.terminal.clear()?;
    Ok(())
  }

  /// Paint the bottom line directly, bypassing ratatui. Prompts use this
  /// while the editor state is borrowed by the running command, so callers
  /// must [`Terminal::clear`] once the prompt is done.
  pub fn draw_bottom_line(&mut self, text: &str, cursor_col: u16) -> Result<()> {
    let area = self.size()?;
    let row = area.height.saturating_sub(1);
    let backend = self.terminal.backend_mut();
    queue!(
      backend,
      MoveTo(0, row),
      Clear(ClearType::CurrentLine),
      Print(text),
      MoveTo(cursor_col.min(area.width.saturating_sub(1)), row)
    )?;
    backend.flush()?;
    Ok(())
  }
}
