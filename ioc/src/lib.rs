//! # Wiring IoC
//!
//! A small, thread-safe Inversion of Control (IoC) container that builds an
//! object graph from declared bindings.
//!
//! ## Core Concepts
//!
//! - **Container**: owns the binding table and the singleton cache. There is no
//!   global instance; the composition root creates one and passes it along.
//! - **Contract**: what consumers ask for, usually a trait object type such as
//!   `dyn Repository`, optionally qualified by a name.
//! - **Lifetime**: `Singleton` (one lazily created instance per container) or
//!   `Transient` (a fresh instance per resolution).
//! - **Resolution**: fallible. Missing bindings and dependency cycles are
//!   reported as [`ResolveError`]s instead of panics.
//!
//! ## Quick Start
//!
//! ```
//! use wiring_ioc::{resolve, Container, Lifetime, ResolveError};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!     message: Arc<String>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         self.message.to_string()
//!     }
//! }
//!
//! fn main() -> Result<(), ResolveError> {
//!     let container = Container::new();
//!     container.add_instance_with_name("greeting_message", Arc::new(String::from("Hello, World!")))?;
//!
//!     // The factory resolves its own dependency from the container it is given.
//!     container.register::<dyn Greeter>(Lifetime::Singleton, |c| {
//!         let message = resolve!(c, String, "greeting_message")?;
//!         Ok(Arc::new(EnglishGreeter { message }))
//!     })?;
//!
//!     let greeter = resolve!(container, trait Greeter)?;
//!     assert_eq!(greeter.greet(), "Hello, World!");
//!     Ok(())
//! }
//! ```

mod container;
mod core;
mod error;
#[cfg(feature = "local")]
mod local_container;
mod macros;

pub use crate::core::{ContractKey, Lifetime};
pub use container::Container;
pub use error::{ResolveError, Result};
#[cfg(feature = "local")]
pub use local_container::LocalContainer;
