use crate::contract::Source;
use crate::sequence::Sequence;

/// The production [`Source`]: two fixed items per operation, then completion.
#[derive(Debug, Default)]
pub struct StaticSource;

impl StaticSource {
  pub fn new() -> Self {
    StaticSource
  }
}

impl Source for StaticSource {
  fn serve_hello_world(&self) -> Sequence<String> {
    Sequence::from_items(["Hello".to_string(), "World".to_string()])
  }

  fn serve_john_doe(&self) -> Sequence<String> {
    Sequence::from_items(["John".to_string(), "Doe".to_string()])
  }
}
