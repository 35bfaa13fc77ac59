//! Contract keys, lifetimes and the cycle guard shared by both containers.

use crate::error::ResolveError;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_container_id() -> u64 {
  NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

thread_local! {
  // Contracts currently being resolved on this thread, in resolution order.
  // Entries are tagged with the owning container so that two containers
  // resolving the same contract do not look like a cycle.
  static RESOLVING_STACK: RefCell<Vec<(u64, ContractKey)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard used to detect circular dependencies.
///
/// Entering pushes the contract onto the thread-local resolution stack. If the
/// contract is already on the stack for the same container, entering fails with
/// [`ResolveError::CyclicDependency`] carrying the full resolution path.
/// Dropping the guard pops the entry again.
pub(crate) struct ResolutionGuard {
  container_id: u64,
}

impl ResolutionGuard {
  pub(crate) fn enter(container_id: u64, key: &ContractKey) -> Result<Self, ResolveError> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(id, k)| *id == container_id && k == key)
      {
        let mut path: Vec<ContractKey> = stack[start..]
          .iter()
          .filter(|(id, _)| *id == container_id)
          .map(|(_, k)| k.clone())
          .collect();
        path.push(key.clone());
        return Err(ResolveError::CyclicDependency { path });
      }
      stack.push((container_id, key.clone()));
      Ok(Self { container_id })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|(id, _)| *id == self.container_id) {
        stack.remove(pos);
      }
    });
  }
}

/// Identifies a capability contract inside a container: the contract type plus
/// an optional qualifying name.
#[derive(Clone)]
pub struct ContractKey {
  type_id: TypeId,
  type_name: &'static str,
  name: Option<String>,
}

impl ContractKey {
  pub fn of<T: ?Sized + Any>(name: Option<&str>) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: name.map(str::to_owned),
    }
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

// `type_name` is informational only; identity is the `TypeId` and the name.
impl PartialEq for ContractKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for ContractKey {}

impl Hash for ContractKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Debug for ContractKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}

impl fmt::Display for ContractKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{} (\"{}\")", self.type_name, name),
      None => f.write_str(self.type_name),
    }
  }
}

/// How long an instance produced by a binding lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Lifetime {
  /// At most one instance per container, created on first resolution.
  #[default]
  Singleton,
  /// A fresh instance for every resolution.
  Transient,
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Lifetime::Singleton => f.write_str("singleton"),
      Lifetime::Transient => f.write_str("transient"),
    }
  }
}
