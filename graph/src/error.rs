use thiserror::Error;

/// The failure signal a [`Sequence`](crate::Sequence) can emit instead of
/// completing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sequence failed: {reason}")]
pub struct SequenceError {
  reason: String,
}

impl SequenceError {
  pub fn new(reason: impl Into<String>) -> Self {
    Self {
      reason: reason.into(),
    }
  }

  pub fn reason(&self) -> &str {
    &self.reason
  }
}

/// Errors returned by [`Client`](crate::Client) session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  #[error("client session was already destroyed")]
  Destroyed,
}

/// Errors raised while loading a wiring configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read wiring file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse wiring: {0}")]
  Parse(String),

  #[error("Unknown wiring preset '{0}', expected one of: naive, shared")]
  UnknownPreset(String),
}

impl From<serde_yaml::Error> for ConfigError {
  fn from(err: serde_yaml::Error) -> Self {
    ConfigError::Parse(err.to_string())
  }
}
