//! Interactive questions the editor asks while running a command.
//!
//! The editor never talks to a terminal directly. Commands that need input
//! (a file name, a search phrase, a yes/no answer) go through [`Prompt`],
//! which the client implements on top of its own event loop.

/// Source of answers for interactive commands.
pub trait Prompt {
  /// Ask for a line of text, pre-filled with `initial`. `None` means the
  /// user cancelled.
  fn read_string(&mut self, label: &str, initial: &str) -> Option<String>;

  /// Ask a single-key question. Only characters in `answers` are accepted;
  /// `None` means the user cancelled.
  fn query(&mut self, label: &str, answers: &[char]) -> Option<char>;
}

/// A prompt that replays canned answers, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
  pub strings: std::collections::VecDeque<Option<String>>,
  pub answers: std::collections::VecDeque<Option<char>>,
  pub labels:  Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn string(mut self, answer: impl Into<String>) -> Self {
    self.strings.push_back(Some(answer.into()));
    self
  }

  pub fn cancel_string(mut self) -> Self {
    self.strings.push_back(None);
    self
  }

  pub fn answer(mut self, answer: char) -> Self {
    self.answers.push_back(Some(answer));
    self
  }

  pub fn is_exhausted(&self) -> bool {
    self.strings.is_empty() && self.answers.is_empty()
  }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
  fn read_string(&mut self, label: &str, initial: &str) -> Option<String> {
    self.labels.push(format!("{label}[{initial}]"));
    self
      .strings
      .pop_front()
      .expect("prompt asked for an unscripted string")
  }

  fn query(&mut self, label: &str, answers: &[char]) -> Option<char> {
    self.labels.push(label.to_string());
    let answer = self
      .answers
      .pop_front()
      .expect("prompt asked an unscripted question");
    if let Some(c) = answer {
      assert!(answers.contains(&c), "{c} is not one of {answers:?}");
    }
    answer
  }
}
