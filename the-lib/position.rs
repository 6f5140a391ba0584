use std::fmt;

use crate::document::Line;

/// This is a single point in a document: an absolute line index and a
/// column counted in `char`s.
/// 0-indexed as all things should be.
///
/// Ordering is row-major, so comparing two positions tells which one comes
/// first in reading order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub row: usize,
  pub col: usize,
}

impl Position {
  pub const fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  pub const fn zero() -> Self {
    Self { row: 0, col: 0 }
  }

  /// Position right after `payload` once it has been spliced in at `self`.
  ///
  /// A single-line payload advances the column; a multi-line payload ends on
  /// its last line, at that line's length.
  pub fn traverse(self, payload: &[Line]) -> Self {
    let Self { row, col } = self;
    match payload {
      [] => self,
      [only] => Self::new(row, col + only.len()),
      [.., last] => Self::new(row + payload.len() - 1, last.len()),
    }
  }
}

impl From<(usize, usize)> for Position {
  fn from(value: (usize, usize)) -> Self {
    Position::new(value.0, value.1)
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.row, self.col)
  }
}
