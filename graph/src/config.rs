//! Wiring configuration: which lifetime each production binding gets.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use wiring_ioc::Lifetime;

/// Lifetimes of the production bindings.
///
/// Loaded from YAML such as:
///
/// ```yaml
/// source: singleton
/// repository: transient
/// ```
///
/// Missing fields default to `singleton`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Wiring {
  #[serde(default)]
  pub source: Lifetime,
  #[serde(default)]
  pub repository: Lifetime,
}

impl Wiring {
  /// A fresh source and repository for every client.
  pub const NAIVE: Wiring = Wiring {
    source: Lifetime::Transient,
    repository: Lifetime::Transient,
  };

  /// One source and one repository shared by every client.
  pub const SHARED: Wiring = Wiring {
    source: Lifetime::Singleton,
    repository: Lifetime::Singleton,
  };

  pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_yaml_str(&contents)
  }
}

impl Default for Wiring {
  fn default() -> Self {
    Wiring::SHARED
  }
}

impl FromStr for Wiring {
  type Err = ConfigError;

  /// Parses a preset name.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "naive" => Ok(Wiring::NAIVE),
      "shared" => Ok(Wiring::SHARED),
      other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
  }
}
