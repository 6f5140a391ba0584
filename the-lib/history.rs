use thiserror::Error;

use crate::{
  document::{
    Document,
    Line,
  },
  position::Position,
};

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Boundary conditions reported by [`History::undo`] and [`History::redo`].
/// Neither touches the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
  #[error("already at oldest change")]
  NothingToUndo,
  #[error("already at newest change")]
  NothingToRedo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
  Inserted,
  Removed,
}

/// One undoable unit of change.
///
/// The payload is the exact text that was inserted at (or removed from)
/// `anchor`, split into lines. It always holds at least one line; a payload
/// of two empty lines is a single line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
  kind:     OperationKind,
  anchor:   Position,
  payload:  Vec<Line>,
  finished: bool,
}

impl EditOperation {
  /// Start an operation that still accepts coalesced contributions.
  pub fn new(kind: OperationKind, anchor: Position) -> Self {
    Self {
      kind,
      anchor,
      payload: vec![Line::new()],
      finished: false,
    }
  }

  /// An operation that is complete on creation, such as a paste or a cut.
  pub fn atomic(kind: OperationKind, anchor: Position, payload: Vec<Line>) -> Self {
    let payload = if payload.is_empty() {
      vec![Line::new()]
    } else {
      payload
    };
    Self {
      kind,
      anchor,
      payload,
      finished: true,
    }
  }

  pub fn kind(&self) -> OperationKind {
    self.kind
  }

  pub fn anchor(&self) -> Position {
    self.anchor
  }

  pub fn payload(&self) -> &[Line] {
    &self.payload
  }

  pub fn is_finished(&self) -> bool {
    self.finished
  }

  /// Replay the operation in its original direction.
  pub fn apply(&self, doc: &mut Document) {
    match self.kind {
      OperationKind::Inserted => doc.splice_insert(self.anchor, &self.payload),
      OperationKind::Removed => doc.splice_remove(self.anchor, &self.payload),
    }
  }

  /// Apply the inverse of the operation.
  pub fn revert(&self, doc: &mut Document) {
    match self.kind {
      OperationKind::Inserted => doc.splice_remove(self.anchor, &self.payload),
      OperationKind::Removed => doc.splice_insert(self.anchor, &self.payload),
    }
  }

  fn push_char(&mut self, c: char) {
    if let Some(last) = self.payload.last_mut() {
      last.push(c);
    }
  }

  fn prepend_char(&mut self, c: char) {
    if let Some(first) = self.payload.first_mut() {
      first.insert(0, c);
    }
  }
}

/// Linear edit history of one buffer.
///
/// Operations are kept oldest first together with a pointer to the most
/// recently applied one. Undo reverts the operation under the pointer and
/// steps back; redo steps forward and replays. Recording anything while
/// undone operations sit past the pointer discards them.
///
/// Consecutive edits of the same kind are coalesced into the newest
/// operation for as long as it is unfinished. Cursor navigation, undo, and
/// starting an operation of a different kind all finish it, so typing,
/// moving, and typing again yields two separate entries.
#[derive(Debug, Default, Clone)]
pub struct History {
  operations: Vec<EditOperation>,
  // Number of applied operations, i.e. the pointer plus one.
  applied:    usize,
}

impl History {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn operations(&self) -> &[EditOperation] {
    &self.operations
  }

  pub fn len(&self) -> usize {
    self.operations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }

  /// Index of the most recently applied operation, `None` before the first.
  pub fn pointer(&self) -> Option<usize> {
    self.applied.checked_sub(1)
  }

  pub fn can_undo(&self) -> bool {
    self.applied > 0
  }

  pub fn can_redo(&self) -> bool {
    self.applied < self.operations.len()
  }

  /// The most recently applied operation if it is of `kind` and still open.
  fn pending_mut(&mut self, kind: OperationKind) -> Option<&mut EditOperation> {
    let index = self.pointer()?;
    let op = &mut self.operations[index];
    (op.kind == kind && !op.finished).then_some(op)
  }

  fn pending_or_new(&mut self, kind: OperationKind, anchor: Position) -> &mut EditOperation {
    if self.pending_mut(kind).is_none() {
      self.push(EditOperation::new(kind, anchor));
    }
    let index = self.applied - 1;
    &mut self.operations[index]
  }

  /// Append `op` after the pointer, pruning the redo branch.
  pub fn push(&mut self, op: EditOperation) {
    if self.applied < self.operations.len() {
      tracing::debug!(
        "discarding {} undone operation(s)",
        self.operations.len() - self.applied
      );
      self.operations.truncate(self.applied);
    }
    self.finish_pending();
    self.operations.push(op);
    self.applied = self.operations.len();
    tracing::debug!("history now holds {} operation(s)", self.applied);
  }

  /// Close the most recent operation to further coalescing.
  pub fn finish_pending(&mut self) {
    if let Some(index) = self.pointer() {
      self.operations[index].finished = true;
    }
  }

  /// `c` was typed at `before`, the cursor position prior to the edit.
  pub fn record_insert_char(&mut self, before: Position, c: char) {
    self
      .pending_or_new(OperationKind::Inserted, before)
      .push_char(c);
  }

  /// A line break was typed at `before`. While typing this stays part of
  /// the same operation.
  pub fn record_line_break(&mut self, before: Position) {
    self
      .pending_or_new(OperationKind::Inserted, before)
      .payload
      .push(Line::new());
  }

  /// `c` was deleted left of the cursor, which now sits at `after`.
  pub fn record_backspace_char(&mut self, after: Position, c: char) {
    let op = self.pending_or_new(OperationKind::Removed, after);
    op.prepend_char(c);
    op.anchor = after;
  }

  /// The line at the cursor was joined onto the previous one; the cursor
  /// now sits on the former boundary at `after`.
  pub fn record_backspace_join(&mut self, after: Position) {
    let op = self.pending_or_new(OperationKind::Removed, after);
    op.payload.insert(0, Line::new());
    op.anchor = after;
  }

  /// `c` was deleted right of the cursor at `at`.
  pub fn record_delete_char(&mut self, at: Position, c: char) {
    self
      .pending_or_new(OperationKind::Removed, at)
      .push_char(c);
  }

  /// The next line was joined onto the line at the cursor `at`.
  pub fn record_delete_join(&mut self, at: Position) {
    self
      .pending_or_new(OperationKind::Removed, at)
      .payload
      .push(Line::new());
  }

  /// Revert the operation under the pointer and step back.
  pub fn undo(&mut self, doc: &mut Document) -> Result<()> {
    let index = self.pointer().ok_or(HistoryError::NothingToUndo)?;
    let op = &mut self.operations[index];
    op.finished = true;
    tracing::debug!(
      "undo #{index}: {:?} of {} line(s) at {}",
      op.kind,
      op.payload.len(),
      op.anchor
    );
    op.revert(doc);
    self.applied -= 1;
    doc.clamp_cursor();
    Ok(())
  }

  /// Step forward and replay the operation found there.
  pub fn redo(&mut self, doc: &mut Document) -> Result<()> {
    if !self.can_redo() {
      return Err(HistoryError::NothingToRedo);
    }
    let op = &self.operations[self.applied];
    tracing::debug!(
      "redo #{}: {:?} of {} line(s) at {}",
      self.applied,
      op.kind,
      op.payload.len(),
      op.anchor
    );
    op.apply(doc);
    self.applied += 1;
    doc.clamp_cursor();
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use quickcheck::{
    Arbitrary,
    Gen,
  };

  use super::*;

  /// Typing into a document the way a buffer does: edit, then record.
  fn type_str(doc: &mut Document, history: &mut History, text: &str) {
    for c in text.chars() {
      let before = doc.cursor();
      if c == '\n' {
        doc.split_line_at_cursor();
        history.record_line_break(before);
      } else {
        doc.insert_char(c);
        history.record_insert_char(before, c);
      }
    }
  }

  fn backspace(doc: &mut Document, history: &mut History) {
    if let Some(c) = doc.delete_char_before_cursor() {
      history.record_backspace_char(doc.cursor(), c);
    } else if doc.join_with_previous_line() {
      history.record_backspace_join(doc.cursor());
    }
  }

  fn delete(doc: &mut Document, history: &mut History) {
    let at = doc.cursor();
    if let Some(c) = doc.delete_char_at_cursor() {
      history.record_delete_char(at, c);
    } else if doc.join_with_next_line() {
      history.record_delete_join(at);
    }
  }

  #[test]
  fn typing_across_a_line_break_is_one_operation() {
    let mut doc = Document::new();
    let mut history = History::new();
    type_str(&mut doc, &mut history, "ab\ncde");

    assert_eq!(doc.to_strings(), vec!["ab", "cde"]);
    assert_eq!(history.len(), 1);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec![""]);
    assert_eq!(doc.cursor(), Position::zero());

    history.redo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["ab", "cde"]);
  }

  #[test]
  fn backspaces_coalesce_and_track_anchor() {
    let mut doc = Document::from_lines(["ab", "cde"]);
    let mut history = History::new();
    doc.set_cursor(Position::new(1, 3));

    backspace(&mut doc, &mut history);
    backspace(&mut doc, &mut history);
    assert_eq!(doc.to_strings(), vec!["ab", "c"]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.operations()[0].anchor(), Position::new(1, 1));
    assert_eq!(history.operations()[0].payload(), &[vec!['d', 'e']]);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["ab", "cde"]);
    history.redo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["ab", "c"]);
  }

  #[test]
  fn backspace_through_a_line_boundary() {
    let mut doc = Document::from_lines(["ab", "cd"]);
    let mut history = History::new();
    doc.set_cursor(Position::new(1, 1));

    backspace(&mut doc, &mut history);
    backspace(&mut doc, &mut history);
    backspace(&mut doc, &mut history);
    assert_eq!(doc.to_strings(), vec!["ad"]);
    assert_eq!(history.len(), 1);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["ab", "cd"]);
  }

  #[test]
  fn forward_deletes_coalesce_without_moving_anchor() {
    let mut doc = Document::from_lines(["abc", "def"]);
    let mut history = History::new();
    doc.set_cursor(Position::new(0, 1));

    delete(&mut doc, &mut history);
    delete(&mut doc, &mut history);
    delete(&mut doc, &mut history);
    delete(&mut doc, &mut history);
    assert_eq!(doc.to_strings(), vec!["aef"]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.operations()[0].anchor(), Position::new(0, 1));

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["abc", "def"]);
    history.redo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["aef"]);
  }

  #[test]
  fn finishing_splits_operations() {
    let mut doc = Document::new();
    let mut history = History::new();
    type_str(&mut doc, &mut history, "a");
    doc.move_left();
    history.finish_pending();
    type_str(&mut doc, &mut history, "b");

    assert_eq!(doc.to_strings(), vec!["ba"]);
    assert_eq!(history.len(), 2);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["a"]);
    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec![""]);
  }

  #[test]
  fn kind_change_starts_new_operation() {
    let mut doc = Document::new();
    let mut history = History::new();
    type_str(&mut doc, &mut history, "abc");
    backspace(&mut doc, &mut history);
    type_str(&mut doc, &mut history, "d");

    assert_eq!(doc.to_strings(), vec!["abd"]);
    assert_eq!(history.len(), 3);
    assert!(history.operations()[..2].iter().all(EditOperation::is_finished));
  }

  #[test]
  fn boundaries_leave_document_alone() {
    let mut doc = Document::from_lines(["x"]);
    let mut history = History::new();
    assert_eq!(history.undo(&mut doc), Err(HistoryError::NothingToUndo));
    assert_eq!(history.redo(&mut doc), Err(HistoryError::NothingToRedo));
    assert_eq!(doc.to_strings(), vec!["x"]);

    type_str(&mut doc, &mut history, "y");
    assert_eq!(history.redo(&mut doc), Err(HistoryError::NothingToRedo));
    history.undo(&mut doc).unwrap();
    assert_eq!(history.undo(&mut doc), Err(HistoryError::NothingToUndo));
    assert_eq!(history.pointer(), None);
    assert_eq!(doc.to_strings(), vec!["x"]);
  }

  #[test]
  fn recording_after_undo_prunes_redo_branch() {
    let mut doc = Document::new();
    let mut history = History::new();
    type_str(&mut doc, &mut history, "a");
    history.finish_pending();
    type_str(&mut doc, &mut history, "b");
    history.finish_pending();
    type_str(&mut doc, &mut history, "c");
    assert_eq!(history.len(), 3);

    history.undo(&mut doc).unwrap();
    history.undo(&mut doc).unwrap();
    assert_eq!(history.pointer(), Some(0));
    assert_eq!(doc.to_strings(), vec!["a"]);

    doc.move_to_line_end();
    type_str(&mut doc, &mut history, "z");
    assert_eq!(history.len(), 2);
    assert!(!history.can_redo());
    assert_eq!(doc.to_strings(), vec!["az"]);
  }

  #[test]
  fn typing_after_undoing_everything_starts_fresh() {
    let mut doc = Document::new();
    let mut history = History::new();
    type_str(&mut doc, &mut history, "abc");
    history.undo(&mut doc).unwrap();
    type_str(&mut doc, &mut history, "x");

    assert_eq!(history.len(), 1);
    assert_eq!(history.operations()[0].payload(), &[vec!['x']]);
  }

  #[test]
  fn atomic_operation_is_not_extended() {
    let mut doc = Document::new();
    let mut history = History::new();
    let payload = vec![vec!['p']];
    doc.splice_insert(doc.cursor(), &payload);
    doc.set_cursor(Position::new(0, 1));
    history.push(EditOperation::atomic(
      OperationKind::Inserted,
      Position::zero(),
      payload,
    ));
    type_str(&mut doc, &mut history, "q");

    assert_eq!(history.len(), 2);
    history.undo(&mut doc).unwrap();
    assert_eq!(doc.to_strings(), vec!["p"]);
  }

  /// Edits a user can make without navigating in between.
  #[derive(Debug, Clone, Copy)]
  enum Edit {
    Type(char),
    Break,
    Backspace,
    Delete,
  }

  impl Arbitrary for Edit {
    fn arbitrary(g: &mut Gen) -> Self {
      match u8::arbitrary(g) % 4 {
        0 => Edit::Type(*g.choose(&['a', 'b', 'é', '例']).unwrap_or(&'a')),
        1 => Edit::Break,
        2 => Edit::Backspace,
        _ => Edit::Delete,
      }
    }
  }

  quickcheck::quickcheck! {
    fn undo_all_then_redo_all_round_trips(start: Vec<String>, edits: Vec<Edit>) -> bool {
      let start: Vec<String> = start.iter().map(|l| l.replace(['\n', '\r'], "")).collect();
      let original = Document::from_lines(&start);
      let mut doc = original.clone();
      let last = doc.last_row();
      doc.set_cursor(Position::new(last, usize::MAX));
      let mut history = History::new();

      for edit in &edits {
        match edit {
          Edit::Type(c) => {
            let before = doc.cursor();
            doc.insert_char(*c);
            history.record_insert_char(before, *c);
          },
          Edit::Break => {
            let before = doc.cursor();
            doc.split_line_at_cursor();
            history.record_line_break(before);
          },
          Edit::Backspace => backspace(&mut doc, &mut history),
          Edit::Delete => delete(&mut doc, &mut history),
        }
      }
      let edited = doc.lines().to_vec();

      while history.undo(&mut doc).is_ok() {}
      let undone = doc.lines() == original.lines();
      while history.redo(&mut doc).is_ok() {}

      undone && doc.lines() == edited.as_slice()
    }
  }
}
