//! Wrap-around phrase search over document lines.
//!
//! [`SearchState`] remembers the last phrase and the line of the last match,
//! so that repeating a search continues after the previous hit and wraps
//! around past the end of the document.
//!
//! # Design Notes
//!
//! - **Char semantics**: lines and phrases are compared `char` by `char`, so
//!   columns are character indices, not byte offsets.
//! - **Exact**: matching is case-sensitive and contiguous.
//! - **One hit per line**: the scan moves line by line and reports the first
//!   occurrence on a line, so a repeated search never stays on the same line.

use crate::{
  document::Document,
  position::Position,
};

/// Column of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at column 0.
pub fn find_in_line(haystack: &[char], needle: &[char]) -> Option<usize> {
  if needle.is_empty() {
    return Some(0);
  }
  haystack
    .windows(needle.len())
    .position(|window| window == needle)
}

/// Per-buffer search continuation state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchState {
  phrase:    Vec<char>,
  last_line: usize,
}

impl SearchState {
  pub fn new() -> Self {
    Self::default()
  }

  /// The last phrase that was found.
  pub fn phrase(&self) -> String {
    self.phrase.iter().collect()
  }

  pub fn last_line(&self) -> usize {
    self.last_line
  }

  /// Find the next line containing `phrase`.
  ///
  /// A new phrase restarts the scan at the cursor line. Otherwise the scan
  /// resumes on the line after the previous match, runs to the end of the
  /// document and wraps around up to and including the previous match line.
  /// The phrase is remembered either way; on a miss the match line is kept.
  pub fn find(&mut self, doc: &Document, phrase: &str) -> Option<Position> {
    let phrase: Vec<char> = phrase.chars().collect();
    if phrase.is_empty() {
      return None;
    }

    let line_count = doc.line_count();
    let scan_start = if phrase != self.phrase {
      match doc.cursor().row {
        0 => line_count - 1,
        row => row - 1,
      }
    } else {
      self.last_line.min(line_count - 1)
    };

    self.phrase = phrase;

    let rows = (scan_start + 1..line_count).chain(0..=scan_start);
    for row in rows {
      let line = doc.line(row).unwrap_or_default();
      if let Some(col) = find_in_line(line, &self.phrase) {
        self.last_line = row;
        return Some(Position::new(row, col));
      }
    }

    tracing::debug!("search phrase not found");
    None
  }
}
