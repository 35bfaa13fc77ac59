//! The composition root: production bindings and instance bookkeeping.

use crate::client::Client;
use crate::config::Wiring;
use crate::contract::{Repository, Source};
use crate::repository::SourceRepository;
use crate::source::StaticSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use wiring_ioc::{resolve, Container, ResolveError};

/// Counts how many instances of one kind of node were constructed.
#[derive(Debug, Clone, Default)]
pub struct InstanceCounter(Arc<AtomicUsize>);

impl InstanceCounter {
  pub fn record(&self) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }

  pub fn count(&self) -> usize {
    self.0.load(Ordering::SeqCst)
  }
}

/// Construction counters for every node kind of the graph.
#[derive(Debug, Clone, Default)]
pub struct Census {
  pub sources: InstanceCounter,
  pub repositories: InstanceCounter,
  pub clients: InstanceCounter,
}

impl Census {
  pub fn total(&self) -> usize {
    self.sources.count() + self.repositories.count() + self.clients.count()
  }
}

/// Binds the production [`Source`] and [`Repository`] with the lifetimes in
/// `wiring`. Constructions are recorded in `census`.
pub fn register_production(
  container: &Container,
  wiring: Wiring,
  census: &Census,
) -> Result<(), ResolveError> {
  let sources = census.sources.clone();
  container.register::<dyn Source>(wiring.source, move |_| {
    sources.record();
    Ok(Arc::new(StaticSource::new()))
  })?;

  let repositories = census.repositories.clone();
  container.register::<dyn Repository>(wiring.repository, move |c| {
    let source = resolve!(c, trait Source)?;
    repositories.record();
    Ok(Arc::new(SourceRepository::new(source)))
  })?;

  debug!(source = %wiring.source, repository = %wiring.repository, "production graph registered");
  Ok(())
}

/// An explicitly owned composition root.
///
/// Holds the container and the census for one object graph. Create it once at
/// startup and hand out clients from it.
pub struct Module {
  container: Container,
  census: Census,
}

impl Module {
  /// A module with the production graph registered.
  pub fn new(wiring: Wiring) -> Result<Self, ResolveError> {
    let module = Self::empty();
    register_production(&module.container, wiring, &module.census)?;
    Ok(module)
  }

  /// A module with no bindings, for wiring substitutes by hand.
  pub fn empty() -> Self {
    Self {
      container: Container::new(),
      census: Census::default(),
    }
  }

  pub fn container(&self) -> &Container {
    &self.container
  }

  pub fn census(&self) -> &Census {
    &self.census
  }

  /// Builds a client over the container's `dyn Repository`.
  pub fn client(&self) -> Result<Client, ResolveError> {
    let repository = resolve!(self.container, trait Repository)?;
    self.census.clients.record();
    Ok(Client::new(repository))
  }
}
