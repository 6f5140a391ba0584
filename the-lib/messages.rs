//! Status-line message shown to the user after a command.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub level: MessageLevel,
  pub text:  String,
}

/// Holds the one transient message; publishing replaces it.
#[derive(Debug, Clone, Default)]
pub struct MessageCenter {
  active: Option<Message>,
}

impl MessageCenter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn active(&self) -> Option<&Message> {
    self.active.as_ref()
  }

  pub fn publish(&mut self, level: MessageLevel, text: impl Into<String>) {
    let text = text.into();
    match level {
      MessageLevel::Error => tracing::warn!("{text}"),
      _ => tracing::debug!("{text}"),
    }
    self.active = Some(Message { level, text });
  }

  pub fn info(&mut self, text: impl Into<String>) {
    self.publish(MessageLevel::Info, text);
  }

  pub fn warning(&mut self, text: impl Into<String>) {
    self.publish(MessageLevel::Warning, text);
  }

  pub fn error(&mut self, text: impl Into<String>) {
    self.publish(MessageLevel::Error, text);
  }

  pub fn dismiss_active(&mut self) -> Option<Message> {
    self.active.take()
  }
}
