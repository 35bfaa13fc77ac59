//! The main `Container` struct and its associated methods.

use crate::core::{next_container_id, ContractKey, Lifetime, ResolutionGuard};
use crate::error::{ResolveError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace};

type BoxedInstance = Box<dyn Any + Send + Sync>;
type SyncFactory = Box<dyn Fn(&Container) -> Result<BoxedInstance> + Send + Sync>;

enum Provider {
  Instance(BoxedInstance),
  Singleton {
    cell: OnceCell<BoxedInstance>,
    factory: SyncFactory,
  },
  Transient {
    factory: SyncFactory,
  },
}

impl Provider {
  fn from_factory(lifetime: Lifetime, factory: SyncFactory) -> Self {
    match lifetime {
      Lifetime::Singleton => Provider::Singleton {
        cell: OnceCell::new(),
        factory,
      },
      Lifetime::Transient => Provider::Transient { factory },
    }
  }
}

// A binding is frozen while any resolution of it is running and for good once
// one has succeeded.
struct Binding {
  provider: Arc<Provider>,
  resolving: usize,
  sealed: bool,
}

impl Binding {
  fn is_frozen(&self) -> bool {
    self.sealed || self.resolving > 0
  }
}

// Marks one running resolution of `key`. Dropping it ends the resolution,
// sealing the binding if it was marked successful.
struct InFlight<'a> {
  bindings: &'a DashMap<ContractKey, Binding>,
  key: &'a ContractKey,
  succeeded: bool,
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    if let Some(mut binding) = self.bindings.get_mut(self.key) {
      binding.resolving -= 1;
      binding.sealed |= self.succeeded;
    }
  }
}

/// The Inversion of Control (IoC) container.
///
/// Holds the binding table and the singleton cache for one object graph. It is
/// an ordinary owned value: create one at the composition root and pass it (or
/// an `Arc` of it) to whatever needs to resolve from it.
///
/// The container is thread-safe. The first resolution of a singleton is
/// serialized, so concurrent callers always observe a single instance.
///
/// Cycle detection follows the resolution chain of the calling thread only.
/// Two threads that start resolving opposite ends of a singleton cycle at the
/// same time each wait for the other's initialization and deadlock instead of
/// reporting [`ResolveError::CyclicDependency`].
pub struct Container {
  id: u64,
  bindings: DashMap<ContractKey, Binding>,
}

impl Default for Container {
  fn default() -> Self {
    Self {
      id: next_container_id(),
      bindings: DashMap::new(),
    }
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: ContractKey, provider: Provider) -> Result<()> {
    let binding = Binding {
      provider: Arc::new(provider),
      resolving: 0,
      sealed: false,
    };
    match self.bindings.entry(key) {
      Entry::Occupied(entry) if entry.get().is_frozen() => {
        Err(ResolveError::BindingSealed(entry.key().clone()))
      }
      Entry::Occupied(mut entry) => {
        debug!(contract = %entry.key(), "binding replaced");
        entry.insert(binding);
        Ok(())
      }
      Entry::Vacant(entry) => {
        debug!(contract = %entry.key(), "binding registered");
        entry.insert(binding);
        Ok(())
      }
    }
  }

  fn register_internal<I: ?Sized + Any + Send + Sync>(
    &self,
    name: Option<&str>,
    lifetime: Lifetime,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    let key = ContractKey::of::<I>(name);
    let factory: SyncFactory = Box::new(move |c| Ok(Box::new(factory(c)?) as BoxedInstance));
    self.insert(key, Provider::from_factory(lifetime, factory))
  }

  fn resolve_key<I: ?Sized + Any + Send + Sync>(&self, key: ContractKey) -> Result<Arc<I>> {
    let _guard = ResolutionGuard::enter(self.id, &key)?;

    // Freeze the binding and clone the provider out under one shard lock, so
    // no map guard is held while factories run and resolve their own
    // dependencies.
    let provider = match self.bindings.get_mut(&key) {
      Some(mut binding) => {
        binding.resolving += 1;
        Arc::clone(&binding.provider)
      }
      None => return Err(ResolveError::MissingBinding(key)),
    };
    let mut in_flight = InFlight {
      bindings: &self.bindings,
      key: &key,
      succeeded: false,
    };

    trace!(contract = %key, "resolving");
    let resolved = match &*provider {
      Provider::Instance(instance) => instance.downcast_ref::<Arc<I>>().cloned(),
      Provider::Singleton { cell, factory } => cell
        .get_or_try_init(|| {
          let instance = factory(self)?;
          debug!(contract = %key, "singleton created");
          Ok::<_, ResolveError>(instance)
        })?
        .downcast_ref::<Arc<I>>()
        .cloned(),
      Provider::Transient { factory } => factory(self)?
        .downcast::<Arc<I>>()
        .ok()
        .map(|arc_in_a_box| *arc_in_a_box),
    };

    let instance = resolved.ok_or_else(|| ResolveError::TypeMismatch(key.clone()))?;
    in_flight.succeeded = true;
    Ok(instance)
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Binds contract `I` to `factory` with the given lifetime.
  ///
  /// The factory receives the container so it can resolve its own upstream
  /// contracts. Registering again before the contract is first resolved
  /// replaces the binding. While a resolution of the contract is running, or
  /// once one has succeeded, it fails with [`ResolveError::BindingSealed`].
  pub fn register<I: ?Sized + Any + Send + Sync>(
    &self,
    lifetime: Lifetime,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(None, lifetime, factory)
  }

  pub fn register_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    lifetime: Lifetime,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(Some(name), lifetime, factory)
  }

  // --- Singleton Registration ---
  pub fn add_singleton<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(None, Lifetime::Singleton, factory)
  }

  pub fn add_singleton_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(Some(name), Lifetime::Singleton, factory)
  }

  // --- Transient Registration ---
  pub fn add_transient<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(None, Lifetime::Transient, factory)
  }

  pub fn add_transient_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Result<()> {
    self.register_internal(Some(name), Lifetime::Transient, factory)
  }

  // --- Instance Registration ---
  pub fn add_instance<I: ?Sized + Any + Send + Sync>(&self, instance: Arc<I>) -> Result<()> {
    self.insert(ContractKey::of::<I>(None), Provider::Instance(Box::new(instance)))
  }

  pub fn add_instance_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    instance: Arc<I>,
  ) -> Result<()> {
    self.insert(ContractKey::of::<I>(Some(name)), Provider::Instance(Box::new(instance)))
  }

  // --- Resolution ---

  /// Resolves contract `I`.
  ///
  /// Fails with [`ResolveError::MissingBinding`] when nothing is bound and with
  /// [`ResolveError::CyclicDependency`] when the factories form a cycle.
  pub fn resolve<I: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<I>> {
    self.resolve_key(ContractKey::of::<I>(None))
  }

  pub fn resolve_named<I: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<I>> {
    self.resolve_key(ContractKey::of::<I>(Some(name)))
  }

  /// Non-failing lookup. Any resolution error is reported as `None`.
  pub fn get<I: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<I>> {
    self.resolve_key(ContractKey::of::<I>(name)).ok()
  }

  /// Returns whether a binding exists for `I`, without resolving it.
  pub fn contains<I: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> bool {
    self.bindings.contains_key(&ContractKey::of::<I>(name))
  }
}
