use crate::core::ContractKey;
use thiserror::Error;

/// Errors produced while registering or resolving contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// No binding exists for the requested contract.
  #[error("no binding registered for {0}")]
  MissingBinding(ContractKey),

  /// Resolving a contract re-entered its own in-progress resolution.
  /// `path` lists every contract on the cycle, starting and ending with the
  /// contract that was re-entered.
  #[error("circular dependency detected while resolving: {}", display_path(.path))]
  CyclicDependency { path: Vec<ContractKey> },

  /// The contract is being, or has already been, resolved from this
  /// container, so its binding can no longer be replaced.
  #[error("binding for {0} is in use by a resolution and cannot be replaced")]
  BindingSealed(ContractKey),

  /// The binding produced a value that is not an `Arc` of the requested type.
  #[error("binding for {0} produced an instance of an unexpected type")]
  TypeMismatch(ContractKey),

  /// A factory refused to build its instance.
  #[error("factory for {contract} failed: {reason}")]
  Factory { contract: ContractKey, reason: String },
}

impl ResolveError {
  /// Builds a [`ResolveError::Factory`] for the contract `T`.
  pub fn factory<T: ?Sized + 'static>(reason: impl Into<String>) -> Self {
    ResolveError::Factory {
      contract: ContractKey::of::<T>(None),
      reason: reason.into(),
    }
  }

  /// The contract the error is about. For a cycle this is the re-entered one.
  pub fn contract(&self) -> Option<&ContractKey> {
    match self {
      ResolveError::MissingBinding(key)
      | ResolveError::BindingSealed(key)
      | ResolveError::TypeMismatch(key) => Some(key),
      ResolveError::CyclicDependency { path } => path.last(),
      ResolveError::Factory { contract, .. } => Some(contract),
    }
  }
}

fn display_path(path: &[ContractKey]) -> String {
  path
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
