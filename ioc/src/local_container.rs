// ioc/src/local_container.rs

//! A single-threaded, non-thread-safe Inversion of Control container.

use crate::core::{next_container_id, ContractKey, Lifetime, ResolutionGuard};
use crate::error::{ResolveError, Result};
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, trace};

type LocalFactory = Box<dyn Fn(&LocalContainer) -> Result<Box<dyn Any>>>;

// A local, non-thread-safe version of the provider enum.
// It uses `Rc` and `unsync::OnceCell`.
enum LocalProvider {
  Instance(Box<dyn Any>),
  Singleton {
    cell: OnceCell<Box<dyn Any>>,
    factory: LocalFactory,
  },
  Transient {
    factory: LocalFactory,
  },
}

/// A single-threaded Inversion of Control (IoC) container.
///
/// Same contract as [`Container`](crate::Container), built on `HashMap`, `Rc`
/// and `unsync::OnceCell`. It can hold services that are neither `Send` nor
/// `Sync`.
///
/// # Note on API
///
/// Registration takes `&mut self`. Resolution takes `&self`, so factories can
/// resolve their own dependencies from the container they are given.
pub struct LocalContainer {
  id: u64,
  providers: HashMap<ContractKey, Rc<LocalProvider>>,
  sealed: RefCell<HashSet<ContractKey>>,
}

impl Default for LocalContainer {
  fn default() -> Self {
    Self {
      id: next_container_id(),
      providers: HashMap::new(),
      sealed: RefCell::new(HashSet::new()),
    }
  }
}

impl LocalContainer {
  /// Creates a new, empty `LocalContainer`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&mut self, key: ContractKey, provider: LocalProvider) -> Result<()> {
    if self.sealed.borrow().contains(&key) {
      return Err(ResolveError::BindingSealed(key));
    }
    debug!(contract = %key, "local binding registered");
    self.providers.insert(key, Rc::new(provider));
    Ok(())
  }

  fn register_internal<I: ?Sized + Any>(
    &mut self,
    name: Option<&str>,
    lifetime: Lifetime,
    factory: impl Fn(&LocalContainer) -> Result<Rc<I>> + 'static,
  ) -> Result<()> {
    let key = ContractKey::of::<I>(name);
    let factory: LocalFactory = Box::new(move |c| Ok(Box::new(factory(c)?) as Box<dyn Any>));
    let provider = match lifetime {
      Lifetime::Singleton => LocalProvider::Singleton {
        cell: OnceCell::new(),
        factory,
      },
      Lifetime::Transient => LocalProvider::Transient { factory },
    };
    self.insert(key, provider)
  }

  fn resolve_key<I: ?Sized + Any>(&self, key: ContractKey) -> Result<Rc<I>> {
    let _guard = ResolutionGuard::enter(self.id, &key)?;

    let provider = self
      .providers
      .get(&key)
      .cloned()
      .ok_or_else(|| ResolveError::MissingBinding(key.clone()))?;

    trace!(contract = %key, "resolving locally");
    let resolved = match &*provider {
      LocalProvider::Instance(instance) => instance.downcast_ref::<Rc<I>>().cloned(),
      LocalProvider::Singleton { cell, factory } => cell
        .get_or_try_init(|| factory(self))?
        .downcast_ref::<Rc<I>>()
        .cloned(),
      LocalProvider::Transient { factory } => factory(self)?
        .downcast::<Rc<I>>()
        .ok()
        .map(|rc_in_a_box| *rc_in_a_box),
    };

    let instance = resolved.ok_or_else(|| ResolveError::TypeMismatch(key.clone()))?;
    self.sealed.borrow_mut().insert(key);
    Ok(instance)
  }

  // --- PUBLIC API ---

  // --- Registration ---
  pub fn register<I: ?Sized + Any>(
    &mut self,
    lifetime: Lifetime,
    factory: impl Fn(&LocalContainer) -> Result<Rc<I>> + 'static,
  ) -> Result<()> {
    self.register_internal(None, lifetime, factory)
  }

  pub fn register_with_name<I: ?Sized + Any>(
    &mut self,
    name: &str,
    lifetime: Lifetime,
    factory: impl Fn(&LocalContainer) -> Result<Rc<I>> + 'static,
  ) -> Result<()> {
    self.register_internal(Some(name), lifetime, factory)
  }

  pub fn add_singleton<I: ?Sized + Any>(
    &mut self,
    factory: impl Fn(&LocalContainer) -> Result<Rc<I>> + 'static,
  ) -> Result<()> {
    self.register_internal(None, Lifetime::Singleton, factory)
  }

  pub fn add_transient<I: ?Sized + Any>(
    &mut self,
    factory: impl Fn(&LocalContainer) -> Result<Rc<I>> + 'static,
  ) -> Result<()> {
    self.register_internal(None, Lifetime::Transient, factory)
  }

  pub fn add_instance<I: ?Sized + Any>(&mut self, instance: Rc<I>) -> Result<()> {
    self.insert(
      ContractKey::of::<I>(None),
      LocalProvider::Instance(Box::new(instance)),
    )
  }

  // --- Resolution ---

  pub fn resolve<I: ?Sized + Any>(&self) -> Result<Rc<I>> {
    self.resolve_key(ContractKey::of::<I>(None))
  }

  pub fn resolve_named<I: ?Sized + Any>(&self, name: &str) -> Result<Rc<I>> {
    self.resolve_key(ContractKey::of::<I>(Some(name)))
  }

  /// Non-failing lookup. Any resolution error is reported as `None`.
  pub fn get<I: ?Sized + Any>(&self, name: Option<&str>) -> Option<Rc<I>> {
    self.resolve_key(ContractKey::of::<I>(name)).ok()
  }

  pub fn contains<I: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    self.providers.contains_key(&ContractKey::of::<I>(name))
  }
}
