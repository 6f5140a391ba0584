//! One open buffer: a document with its history, selection and search state.
//!
//! Every edit goes through a method here so that the document mutation and
//! the matching history entry can never drift apart.

use std::path::{
  Path,
  PathBuf,
};

use crate::{
  command::Direction,
  document::{
    Document,
    Line,
  },
  file,
  history::{
    self,
    EditOperation,
    History,
    OperationKind,
  },
  position::Position,
  search::SearchState,
  selection::Selection,
};

#[derive(Debug, Default)]
pub struct Buffer {
  document:  Document,
  history:   History,
  selection: Selection,
  search:    SearchState,
  path:      Option<PathBuf>,
  modified:  bool,
}

impl Buffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_document(document: Document, path: Option<PathBuf>) -> Self {
    let mut selection = Selection::new();
    selection.reset(document.cursor());
    Self {
      document,
      history: History::new(),
      selection,
      search: SearchState::new(),
      path,
      modified: false,
    }
  }

  /// Load `path` into a fresh buffer bound to it. A missing file gives an
  /// empty buffer that will be created on first save.
  pub fn open(path: impl Into<PathBuf>) -> file::Result<Self> {
    let path = path.into();
    let document = file::load(&path)?;
    tracing::info!("opened {} ({} line(s))", path.display(), document.line_count());
    Ok(Self::with_document(document, Some(path)))
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn history(&self) -> &History {
    &self.history
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  pub fn search(&self) -> &SearchState {
    &self.search
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  pub fn is_modified(&self) -> bool {
    self.modified
  }

  pub fn cursor(&self) -> Position {
    self.document.cursor()
  }

  pub fn display_name(&self) -> String {
    match &self.path {
      Some(path) => path.display().to_string(),
      None => "<no file>".to_string(),
    }
  }

  fn edited(&mut self) {
    self.modified = true;
    self.selection.follow_cursor(self.document.cursor());
  }

  fn navigated(&mut self) {
    self.history.finish_pending();
    self.selection.follow_cursor(self.document.cursor());
  }

  pub fn insert_char(&mut self, c: char) {
    let before = self.document.cursor();
    self.document.insert_char(c);
    self.history.record_insert_char(before, c);
    self.edited();
  }

  pub fn insert_newline(&mut self) {
    let before = self.document.cursor();
    self.document.split_line_at_cursor();
    self.history.record_line_break(before);
    self.edited();
  }

  /// Backspace. Returns `false` at the start of the document.
  pub fn delete_backward(&mut self) -> bool {
    if let Some(c) = self.document.delete_char_before_cursor() {
      self.history.record_backspace_char(self.document.cursor(), c);
    } else if self.document.join_with_previous_line() {
      self.history.record_backspace_join(self.document.cursor());
    } else {
      return false;
    }
    self.edited();
    true
  }

  /// Forward delete. Returns `false` at the end of the document.
  pub fn delete_forward(&mut self) -> bool {
    let at = self.document.cursor();
    if let Some(c) = self.document.delete_char_at_cursor() {
      self.history.record_delete_char(at, c);
    } else if self.document.join_with_next_line() {
      self.history.record_delete_join(at);
    } else {
      return false;
    }
    self.edited();
    true
  }

  /// Remove the text from the cursor to the end of its line.
  pub fn delete_to_line_end(&mut self) -> bool {
    let at = self.document.cursor();
    let removed: Line = self.document.current_line()[at.col..].to_vec();
    self.remove_atomic(at, removed)
  }

  /// Remove the text from the start of the line up to the cursor.
  pub fn delete_from_line_start(&mut self) -> bool {
    let cursor = self.document.cursor();
    let removed: Line = self.document.current_line()[..cursor.col].to_vec();
    self.remove_atomic(Position::new(cursor.row, 0), removed)
  }

  fn remove_atomic(&mut self, anchor: Position, removed: Line) -> bool {
    if removed.is_empty() {
      return false;
    }
    let payload = vec![removed];
    self.document.splice_remove(anchor, &payload);
    self.document.set_cursor(anchor);
    self
      .history
      .push(EditOperation::atomic(OperationKind::Removed, anchor, payload));
    self.edited();
    true
  }

  pub fn move_cursor(&mut self, direction: Direction) {
    match direction {
      Direction::Up => {
        self.document.move_up();
      },
      Direction::Down => {
        self.document.move_down();
      },
      Direction::Left => self.document.move_left(),
      Direction::Right => self.document.move_right(),
    }
    self.navigated();
  }

  pub fn move_to_line_start(&mut self) {
    self.document.move_to_line_start();
    self.navigated();
  }

  pub fn move_to_line_end(&mut self) {
    self.document.move_to_line_end();
    self.navigated();
  }

  pub fn page_up(&mut self, height: usize) {
    self.document.page_up(height);
    self.navigated();
  }

  pub fn page_down(&mut self, height: usize) {
    self.document.page_down(height);
    self.navigated();
  }

  pub fn toggle_selection(&mut self) {
    self.selection.toggle(self.document.cursor());
  }

  /// The selected text, or `None` when nothing is selected. The selection
  /// is reset either way.
  pub fn copy(&mut self) -> Option<Vec<Line>> {
    let text = (!self.selection.is_empty()).then(|| self.selection.extract_text(&self.document));
    self.selection.reset(self.document.cursor());
    text
  }

  /// Remove the selected text and return it. The cursor lands on the lower
  /// point of the selection.
  pub fn cut(&mut self) -> Option<Vec<Line>> {
    if self.selection.is_empty() {
      self.selection.reset(self.document.cursor());
      return None;
    }

    let payload = self.selection.extract_text(&self.document);
    let (lower, _) = self.selection.normalized_in(&self.document);
    self.document.splice_remove(lower, &payload);
    self.document.set_cursor(lower);
    self.history.push(EditOperation::atomic(
      OperationKind::Removed,
      lower,
      payload.clone(),
    ));
    self.modified = true;
    self.selection.reset(lower);
    Some(payload)
  }

  /// Splice `payload` in at the cursor as one finished operation and place
  /// the cursor right after it.
  pub fn paste(&mut self, payload: &[Line]) {
    if payload.is_empty() {
      return;
    }
    let anchor = self.document.cursor();
    self.document.splice_insert(anchor, payload);
    self.document.set_cursor(anchor.traverse(payload));
    self.history.push(EditOperation::atomic(
      OperationKind::Inserted,
      anchor,
      payload.to_vec(),
    ));
    self.edited();
  }

  pub fn undo(&mut self) -> history::Result<()> {
    self.history.undo(&mut self.document)?;
    self.edited();
    Ok(())
  }

  pub fn redo(&mut self) -> history::Result<()> {
    self.history.redo(&mut self.document)?;
    self.edited();
    Ok(())
  }

  /// Jump to the next occurrence of `phrase`. On a miss nothing changes.
  pub fn find(&mut self, phrase: &str) -> Option<Position> {
    let found = self.search.find(&self.document, phrase)?;
    self.document.set_cursor(found);
    self.navigated();
    Some(found)
  }

  /// Write the document to `path` and bind the buffer to it. On failure the
  /// buffer is left as it was.
  pub fn save_to(&mut self, path: &Path) -> file::Result<()> {
    file::save(path, &self.document)?;
    tracing::info!("saved {}", path.display());
    self.path = Some(path.to_path_buf());
    self.modified = false;
    Ok(())
  }
}
