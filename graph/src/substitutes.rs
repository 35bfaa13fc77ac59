//! Stand-ins for the production nodes.
//!
//! Each type here satisfies the same contract as its production counterpart,
//! so it can be bound into a [`Container`] in place of it or handed to a
//! consumer directly.

use crate::contract::{Repository, Source};
use crate::error::SequenceError;
use crate::sequence::Sequence;
use std::sync::Arc;
use wiring_ioc::{Container, Lifetime, ResolveError};

pub const FAKE_DATA: &str = "Fake Data";

fn fake_data() -> Sequence<String> {
  Sequence::from_items([FAKE_DATA.to_string()])
}

/// A [`Source`] emitting `["Fake Data"]` for every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeSource;

impl Source for FakeSource {
  fn serve_hello_world(&self) -> Sequence<String> {
    fake_data()
  }

  fn serve_john_doe(&self) -> Sequence<String> {
    fake_data()
  }
}

/// A [`Repository`] emitting `["Fake Data"]` without any upstream source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeRepository;

impl Repository for FakeRepository {
  fn fetch_hello_world(&self) -> Sequence<String> {
    fake_data()
  }

  fn fetch_john_doe(&self) -> Sequence<String> {
    fake_data()
  }
}

/// A [`Source`] whose every operation fails.
#[derive(Debug, Clone)]
pub struct FailingSource {
  error: SequenceError,
}

impl FailingSource {
  pub fn new(reason: impl Into<String>) -> Self {
    Self {
      error: SequenceError::new(reason),
    }
  }
}

impl Source for FailingSource {
  fn serve_hello_world(&self) -> Sequence<String> {
    Sequence::failed(self.error.clone())
  }

  fn serve_john_doe(&self) -> Sequence<String> {
    Sequence::failed(self.error.clone())
  }
}

/// Binds [`FakeSource`] as the container's `dyn Source`.
pub fn register_fake_source(container: &Container, lifetime: Lifetime) -> Result<(), ResolveError> {
  container.register::<dyn Source>(lifetime, |_| Ok(Arc::new(FakeSource)))
}

/// Binds [`FakeRepository`] as the container's `dyn Repository`.
pub fn register_fake_repository(
  container: &Container,
  lifetime: Lifetime,
) -> Result<(), ResolveError> {
  container.register::<dyn Repository>(lifetime, |_| Ok(Arc::new(FakeRepository)))
}
