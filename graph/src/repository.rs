use crate::contract::{Repository, Source};
use crate::sequence::Sequence;
use std::sync::Arc;

/// A [`Repository`] that forwards every operation to an injected [`Source`].
///
/// The upstream is a required constructor argument; there is no fallback that
/// looks one up on its own. Sequences, including failures, are returned
/// unchanged.
pub struct SourceRepository {
  source: Arc<dyn Source>,
}

impl SourceRepository {
  pub fn new(source: Arc<dyn Source>) -> Self {
    Self { source }
  }

  pub fn source(&self) -> &Arc<dyn Source> {
    &self.source
  }
}

impl Repository for SourceRepository {
  fn fetch_hello_world(&self) -> Sequence<String> {
    self.source.serve_hello_world()
  }

  fn fetch_john_doe(&self) -> Sequence<String> {
    self.source.serve_john_doe()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::SequenceError;
  use crate::substitutes::{FailingSource, FakeSource, FAKE_DATA};

  #[test]
  fn forwards_to_the_injected_source() {
    let repository = SourceRepository::new(Arc::new(FakeSource));

    assert_eq!(repository.fetch_hello_world().collect().unwrap(), vec![FAKE_DATA]);
    assert_eq!(repository.fetch_john_doe().collect().unwrap(), vec![FAKE_DATA]);
  }

  #[test]
  fn passes_upstream_failures_through() {
    let repository = SourceRepository::new(Arc::new(FailingSource::new("offline")));

    assert_eq!(
      repository.fetch_hello_world().collect(),
      Err(SequenceError::new("offline"))
    );
  }
}
