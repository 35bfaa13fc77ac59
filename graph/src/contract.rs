//! Capability contracts of the graph.
//!
//! Consumers depend on these traits only. Any type implementing one can be
//! bound in a container, wrapped by an adapter, or handed to a [`Client`]
//! directly.
//!
//! [`Client`]: crate::Client

use crate::sequence::Sequence;
use std::fmt;

/// The operations every contract exposes, in the order a client issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
  HelloWorld,
  JohnDoe,
}

impl Operation {
  pub const ALL: [Operation; 2] = [Operation::HelloWorld, Operation::JohnDoe];
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operation::HelloWorld => f.write_str("hello_world"),
      Operation::JohnDoe => f.write_str("john_doe"),
    }
  }
}

/// Produces the raw data. Leaf of the graph.
pub trait Source: Send + Sync {
  fn serve_hello_world(&self) -> Sequence<String>;

  fn serve_john_doe(&self) -> Sequence<String>;

  fn serve(&self, operation: Operation) -> Sequence<String> {
    match operation {
      Operation::HelloWorld => self.serve_hello_world(),
      Operation::JohnDoe => self.serve_john_doe(),
    }
  }
}

/// What clients consume. Usually backed by a [`Source`].
pub trait Repository: Send + Sync {
  fn fetch_hello_world(&self) -> Sequence<String>;

  fn fetch_john_doe(&self) -> Sequence<String>;

  fn fetch(&self, operation: Operation) -> Sequence<String> {
    match operation {
      Operation::HelloWorld => self.fetch_hello_world(),
      Operation::JohnDoe => self.fetch_john_doe(),
    }
  }
}
