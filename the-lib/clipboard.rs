//! In-process clipboard register.
//!
//! Holds the most recent cut or copy payload, shaped like a splice payload
//! so paste can hand it straight to [`crate::document::Document::splice_insert`].

use crate::document::Line;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Clipboard {
  contents: Option<Vec<Line>>,
}

impl Clipboard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, contents: Vec<Line>) {
    self.contents = (!contents.is_empty()).then_some(contents);
  }

  pub fn get(&self) -> Option<&[Line]> {
    self.contents.as_deref()
  }

  pub fn is_empty(&self) -> bool {
    self.contents.is_none()
  }

  pub fn to_strings(&self) -> Vec<String> {
    self
      .get()
      .unwrap_or_default()
      .iter()
      .map(|line| line.iter().collect())
      .collect()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn holds_latest_payload() {
    let mut clipboard = Clipboard::new();
    assert!(clipboard.is_empty());

    clipboard.set(vec![vec!['a'], vec!['b', 'c']]);
    assert_eq!(clipboard.to_strings(), vec!["a", "bc"]);

    clipboard.set(vec![vec!['z']]);
    assert_eq!(clipboard.get(), Some(&[vec!['z']][..]));

    clipboard.set(Vec::new());
    assert!(clipboard.is_empty());
  }
}
