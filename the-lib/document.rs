//! Line-oriented document storage and the splice primitive.
//!
//! A [`Document`] is an ordered list of lines, each a `Vec<char>`, plus a
//! cursor. It always holds at least one line: an empty document is a single
//! empty line.
//!
//! # Splicing
//!
//! [`Document::splice_insert`] and [`Document::splice_remove`] reshape the line
//! array around an anchor and a payload of one or more lines. They are exact
//! inverses for the same anchor and payload:
//!
//! ```
//! use the_lib::{
//!   document::Document,
//!   position::Position,
//! };
//!
//! let mut doc = Document::from_lines(["hello world"]);
//! let payload = vec!["big".chars().collect(), "wide ".chars().collect()];
//! let anchor = Position::new(0, 6);
//!
//! doc.splice_insert(anchor, &payload);
//! assert_eq!(doc.to_strings(), vec!["hello big", "wide world"]);
//!
//! doc.splice_remove(anchor, &payload);
//! assert_eq!(doc.to_strings(), vec!["hello world"]);
//! ```
//!
//! Undo and redo are built entirely on this pair, see [`crate::history`].
//!
//! # Cursor
//!
//! The cursor is an absolute [`Position`]. Character edits keep it valid by
//! construction; structural changes that may strand it (undo removing lines,
//! for instance) are followed by [`Document::clamp_cursor`].

use crate::position::Position;

/// A single line of text, without its line terminator.
pub type Line = Vec<char>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  lines:  Vec<Line>,
  cursor: Position,
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  pub fn new() -> Self {
    Self {
      lines:  vec![Line::new()],
      cursor: Position::zero(),
    }
  }

  /// Build a document from already split lines. An empty iterator yields the
  /// one-empty-line document.
  pub fn from_lines<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut lines: Vec<Line> = lines
      .into_iter()
      .map(|line| line.as_ref().chars().collect())
      .collect();
    if lines.is_empty() {
      lines.push(Line::new());
    }

    Self {
      lines,
      cursor: Position::zero(),
    }
  }

  pub fn lines(&self) -> &[Line] {
    &self.lines
  }

  pub fn line(&self, row: usize) -> Option<&[char]> {
    self.lines.get(row).map(Vec::as_slice)
  }

  pub fn line_count(&self) -> usize {
    self.lines.len()
  }

  pub fn last_row(&self) -> usize {
    self.lines.len() - 1
  }

  /// Length in `char`s of `row`, or 0 past the end of the document.
  pub fn line_len(&self, row: usize) -> usize {
    self.lines.get(row).map_or(0, Vec::len)
  }

  pub fn current_line(&self) -> &[char] {
    &self.lines[self.cursor.row]
  }

  pub fn to_strings(&self) -> Vec<String> {
    self
      .lines
      .iter()
      .map(|line| line.iter().collect())
      .collect()
  }

  pub fn cursor(&self) -> Position {
    self.cursor
  }

  /// Move the cursor, clamping it into the document.
  pub fn set_cursor(&mut self, pos: Position) {
    self.cursor = self.clamp_position(pos);
  }

  /// Bring `pos` inside the document: the row onto an existing line, then
  /// the column onto that line.
  pub fn clamp_position(&self, pos: Position) -> Position {
    let row = pos.row.min(self.last_row());
    let col = pos.col.min(self.line_len(row));
    Position::new(row, col)
  }

  /// Correct a cursor stranded by a structural change.
  ///
  /// A row past the last line is decremented until it lands on a line, and
  /// the column is truncated to that line's length. A row that no longer
  /// exists has no length to truncate against, so the row goes first.
  pub fn clamp_cursor(&mut self) {
    while self.cursor.row >= self.lines.len() {
      self.cursor.row -= 1;
    }
    let len = self.lines[self.cursor.row].len();
    if self.cursor.col > len {
      self.cursor.col = len;
    }
  }

  pub fn insert_char(&mut self, c: char) {
    let Position { row, col } = self.cursor;
    self.lines[row].insert(col, c);
    self.cursor.col += 1;
  }

  /// Split the current line at the cursor. The suffix becomes a new line
  /// right after it and the cursor moves to its start.
  pub fn split_line_at_cursor(&mut self) {
    let Position { row, col } = self.cursor;
    let suffix = self.lines[row].split_off(col);
    self.lines.insert(row + 1, suffix);
    self.cursor = Position::new(row + 1, 0);
  }

  /// Merge the next line into the current one. Returns `false` on the last
  /// line, where there is nothing to join.
  pub fn join_with_next_line(&mut self) -> bool {
    let row = self.cursor.row;
    if row >= self.last_row() {
      return false;
    }
    let next = self.lines.remove(row + 1);
    self.lines[row].extend(next);
    true
  }

  /// Merge the current line into the previous one, leaving the cursor on the
  /// former boundary. Returns `false` on the first line.
  pub fn join_with_previous_line(&mut self) -> bool {
    let row = self.cursor.row;
    if row == 0 {
      return false;
    }
    let line = self.lines.remove(row);
    let boundary = self.lines[row - 1].len();
    self.lines[row - 1].extend(line);
    self.cursor = Position::new(row - 1, boundary);
    true
  }

  pub fn delete_char_before_cursor(&mut self) -> Option<char> {
    let Position { row, col } = self.cursor;
    if col == 0 {
      return None;
    }
    let removed = self.lines[row].remove(col - 1);
    self.cursor.col -= 1;
    Some(removed)
  }

  pub fn delete_char_at_cursor(&mut self) -> Option<char> {
    let Position { row, col } = self.cursor;
    if col >= self.lines[row].len() {
      return None;
    }
    Some(self.lines[row].remove(col))
  }

  /// Insert `payload` at `anchor`.
  ///
  /// A single-line payload goes verbatim into the anchor line. With more
  /// lines, the first payload line is appended to the text before the anchor,
  /// the last one is prepended to the text after it, and interior lines are
  /// inserted whole in between. The cursor is not moved.
  pub fn splice_insert(&mut self, anchor: Position, payload: &[Line]) {
    let Position { row, col } = self.clamp_position(anchor);
    match payload {
      [] => {},
      [only] => {
        self.lines[row].splice(col..col, only.iter().copied());
      },
      [first, interior @ .., last] => {
        let suffix = self.lines[row].split_off(col);
        self.lines[row].extend_from_slice(first);

        let mut tail = last.clone();
        tail.extend(suffix);

        let inserted = interior.iter().cloned().chain(std::iter::once(tail));
        self.lines.splice(row + 1..row + 1, inserted);
      },
    }
    tracing::trace!(
      "splice insert of {} line(s) at {row}:{col}",
      payload.len()
    );
  }

  /// Undo [`Document::splice_insert`] of the same `payload` at `anchor`.
  ///
  /// Only the payload's shape is used: its line count, and the length of
  /// its last line, which is where the surviving suffix starts on the line
  /// `payload.len() - 1` rows below the anchor.
  pub fn splice_remove(&mut self, anchor: Position, payload: &[Line]) {
    let Position { row, col } = self.clamp_position(anchor);
    match payload {
      [] => {},
      [only] => {
        let end = (col + only.len()).min(self.lines[row].len());
        self.lines[row].drain(col..end);
      },
      [.., last] => {
        let end_row = (row + payload.len() - 1).min(self.last_row());
        let end_col = last.len().min(self.lines[end_row].len());
        let suffix = self.lines[end_row].split_off(end_col);

        self.lines[row].truncate(col);
        self.lines[row].extend(suffix);
        self.lines.drain(row + 1..=end_row);
      },
    }
    tracing::trace!(
      "splice remove of {} line(s) at {row}:{col}",
      payload.len()
    );
  }

  pub fn move_left(&mut self) {
    self.cursor.col = self.cursor.col.saturating_sub(1);
  }

  pub fn move_right(&mut self) {
    if self.cursor.col < self.current_line().len() {
      self.cursor.col += 1;
    }
  }

  /// Returns `false` when already on the first line.
  pub fn move_up(&mut self) -> bool {
    if self.cursor.row == 0 {
      return false;
    }
    self.cursor.row -= 1;
    self.clamp_cursor();
    true
  }

  /// Returns `false` when already on the last line.
  pub fn move_down(&mut self) -> bool {
    if self.cursor.row >= self.last_row() {
      return false;
    }
    self.cursor.row += 1;
    self.clamp_cursor();
    true
  }

  pub fn move_to_line_start(&mut self) {
    self.cursor.col = 0;
  }

  pub fn move_to_line_end(&mut self) {
    self.cursor.col = self.current_line().len();
  }

  pub fn page_up(&mut self, height: usize) {
    self.cursor.row = self.cursor.row.saturating_sub(height);
    self.clamp_cursor();
  }

  pub fn page_down(&mut self, height: usize) {
    self.cursor.row = self
      .cursor
      .row
      .saturating_add(height)
      .min(self.last_row());
    self.clamp_cursor();
  }
}
