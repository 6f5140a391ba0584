//! Single anchor/active selection.
//!
//! A [`Selection`] has two positions: `anchor`, where selecting started, and
//! `active`, which follows the cursor while selecting is on. When both are
//! equal the selection is empty and selects nothing.
//!
//! ```text
//! anchor=(0,2), active=(1,3):  "he[llo"    (forward selection)
//!                              "wor]ld"
//! anchor=(1,3), active=(0,2):  same text, normalized the same way
//! ```

use crate::{
  document::{
    Document,
    Line,
  },
  position::Position,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
  anchor:    Position,
  active:    Position,
  selecting: bool,
}

impl Selection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_points(anchor: Position, active: Position) -> Self {
    Self {
      anchor,
      active,
      selecting: false,
    }
  }

  pub fn anchor(&self) -> Position {
    self.anchor
  }

  pub fn active(&self) -> Position {
    self.active
  }

  pub fn is_selecting(&self) -> bool {
    self.selecting
  }

  pub fn is_empty(&self) -> bool {
    self.anchor == self.active
  }

  /// Start selecting at `cursor`, or stop selecting and keep the points.
  pub fn toggle(&mut self, cursor: Position) {
    if !self.selecting {
      self.anchor = cursor;
      self.active = cursor;
      tracing::debug!("started selecting at {cursor}");
    } else {
      tracing::debug!("stopped selecting at {}", self.active);
    }
    self.selecting = !self.selecting;
  }

  /// Called after every cursor-moving command.
  pub fn follow_cursor(&mut self, cursor: Position) {
    if self.selecting {
      self.active = cursor;
    }
  }

  /// Collapse onto `cursor` and stop selecting.
  pub fn reset(&mut self, cursor: Position) {
    self.anchor = cursor;
    self.active = cursor;
    self.selecting = false;
  }

  /// The two points in reading order, as `(lower, higher)`.
  ///
  /// Points are swapped as whole units: the point on the smaller line is
  /// lower, and on the same line the one with the smaller column is. The
  /// lower point may therefore have the larger column.
  pub fn normalized(&self) -> (Position, Position) {
    let (anchor, active) = (self.anchor, self.active);
    if anchor.row > active.row || (anchor.row == active.row && anchor.col > active.col) {
      (active, anchor)
    } else {
      (anchor, active)
    }
  }

  /// [`Selection::normalized`] with both points clamped into `doc`.
  pub fn normalized_in(&self, doc: &Document) -> (Position, Position) {
    let (lower, higher) = self.normalized();
    let (lower, higher) = (doc.clamp_position(lower), doc.clamp_position(higher));
    // Points clamped onto the same line may have crossed.
    (lower.min(higher), lower.max(higher))
  }

  /// Whether the character at `pos` is selected.
  ///
  /// The range is `[lower, higher)` in row-major order: interior lines are
  /// fully selected, the first line from the lower column on, the last line
  /// up to but excluding the higher column.
  pub fn contains(&self, pos: Position) -> bool {
    if self.is_empty() {
      return false;
    }
    let (lower, higher) = self.normalized();
    let Position { row, col } = pos;

    if row > lower.row && row < higher.row {
      return true;
    }
    if row == lower.row && col >= lower.col && (row < higher.row || col < higher.col) {
      return true;
    }
    row == higher.row && col < higher.col && (row > lower.row || col >= lower.col)
  }

  /// Line-by-line text covered by the selection, for copy and cut.
  ///
  /// The result is shaped as a splice payload: removing it at the lower
  /// point deletes exactly the selected text.
  pub fn extract_text(&self, doc: &Document) -> Vec<Line> {
    let (lower, higher) = self.normalized_in(doc);

    (lower.row..=higher.row)
      .map(|row| {
        let line = doc.line(row).unwrap_or_default();
        let (first, last) = if row == lower.row {
          let last = if lower.row == higher.row {
            higher.col
          } else {
            line.len()
          };
          (lower.col, last)
        } else if row == higher.row {
          (0, higher.col)
        } else {
          (0, line.len())
        };
        line[first..last].to_vec()
      })
      .collect()
  }
}
