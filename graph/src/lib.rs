//! # Wiring Graph
//!
//! A three-node object graph, `Source -> Repository -> Client`, wired through a
//! [`wiring_ioc::Container`].
//!
//! - [`Source`] and [`Repository`] are capability contracts. Consumers only see
//!   these traits, never the concrete types behind them.
//! - [`StaticSource`] is the production leaf, [`SourceRepository`] the adapter
//!   that forwards to whichever `Source` it was constructed with.
//! - [`Client`] runs a session over a `Repository` and owns one
//!   [`Subscription`] per operation.
//! - [`Module`] is the composition root. The lifetimes it binds come from a
//!   [`Wiring`], either a preset or a YAML file.
//!
//! ## Quick Start
//!
//! ```
//! use wiring_graph::{Module, Operation, Wiring};
//!
//! let module = Module::new(Wiring::SHARED).unwrap();
//!
//! let mut client = module.client().unwrap();
//! client.start().unwrap();
//! assert_eq!(client.output(Operation::HelloWorld), vec!["Hello", "World"]);
//! assert_eq!(client.output(Operation::JohnDoe), vec!["John", "Doe"]);
//! client.destroy();
//! assert_eq!(client.held_subscriptions(), 0);
//! ```

mod client;
mod config;
mod contract;
mod error;
mod module;
mod repository;
mod sequence;
mod source;
#[cfg(any(test, feature = "substitutes"))]
pub mod substitutes;

pub use client::{Client, ClientState, Event, Observation};
pub use config::Wiring;
pub use contract::{Operation, Repository, Source};
pub use error::{ClientError, ConfigError, SequenceError};
pub use module::{register_production, Census, InstanceCounter, Module};
pub use repository::SourceRepository;
pub use sequence::{Emitter, Observer, Sequence, Subscription};
pub use source::StaticSource;
