//! The consuming end of the graph: a client session over a [`Repository`].

use crate::contract::{Operation, Repository};
use crate::error::{ClientError, SequenceError};
use crate::sequence::{Observer, Subscription};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of a [`Client`]. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
  Idle,
  Running,
  Destroyed,
}

/// A signal the client observed on one of its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Item(String),
  Completed,
  Failed(SequenceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
  pub operation: Operation,
  pub event: Event,
}

struct Recorder<'t> {
  operation: Operation,
  transcript: &'t mut Vec<Observation>,
}

impl Recorder<'_> {
  fn record(&mut self, event: Event) {
    self.transcript.push(Observation {
      operation: self.operation,
      event,
    });
  }
}

impl Observer<String> for Recorder<'_> {
  fn on_next(&mut self, item: String) {
    info!(operation = %self.operation, %item, "received");
    self.record(Event::Item(item));
  }

  fn on_error(&mut self, error: SequenceError) {
    warn!(operation = %self.operation, %error, "operation failed");
    self.record(Event::Failed(error));
  }

  fn on_complete(&mut self) {
    self.record(Event::Completed);
  }
}

/// A session that consumes a [`Repository`].
///
/// Each configured operation owns one subscription slot. Starting an operation
/// releases whatever the slot held before subscribing again, and destroying the
/// session (explicitly or by dropping it) releases every slot.
///
/// The transcript holds the latest run of each operation: re-subscribing an
/// operation discards what its previous run recorded.
pub struct Client {
  repository: Arc<dyn Repository>,
  operations: Vec<Operation>,
  slots: HashMap<Operation, Subscription>,
  transcript: Vec<Observation>,
  state: ClientState,
}

impl Client {
  /// A client issuing every [`Operation`] in declaration order.
  pub fn new(repository: Arc<dyn Repository>) -> Self {
    Self::with_operations(repository, Operation::ALL)
  }

  pub fn with_operations(
    repository: Arc<dyn Repository>,
    operations: impl IntoIterator<Item = Operation>,
  ) -> Self {
    Self {
      repository,
      operations: operations.into_iter().collect(),
      slots: HashMap::new(),
      transcript: Vec::new(),
      state: ClientState::Idle,
    }
  }

  pub fn state(&self) -> ClientState {
    self.state
  }

  pub fn repository(&self) -> &Arc<dyn Repository> {
    &self.repository
  }

  /// Runs every configured operation in order. Allowed while idle or already
  /// running; a destroyed session cannot be restarted.
  pub fn start(&mut self) -> Result<(), ClientError> {
    if self.state == ClientState::Destroyed {
      return Err(ClientError::Destroyed);
    }
    self.state = ClientState::Running;
    for operation in self.operations.clone() {
      self.subscribe(operation);
    }
    Ok(())
  }

  /// Runs a single operation, replacing the slot's previous subscription.
  pub fn show(&mut self, operation: Operation) -> Result<(), ClientError> {
    if self.state == ClientState::Destroyed {
      return Err(ClientError::Destroyed);
    }
    self.state = ClientState::Running;
    self.subscribe(operation);
    Ok(())
  }

  fn subscribe(&mut self, operation: Operation) {
    // The old subscription goes first, so a slot never holds two at once.
    self.release(operation);
    self.transcript.retain(|o| o.operation != operation);

    let sequence = self.repository.fetch(operation);
    let recorder = Recorder {
      operation,
      transcript: &mut self.transcript,
    };
    let subscription = sequence.subscribe_with(recorder);
    self.slots.insert(operation, subscription);
  }

  /// Releases the subscription held for `operation`, if any. Returns whether a
  /// subscription was held. Safe to call repeatedly.
  pub fn release(&mut self, operation: Operation) -> bool {
    match self.slots.remove(&operation) {
      Some(subscription) => {
        subscription.unsubscribe();
        debug!(%operation, "subscription released");
        true
      }
      None => false,
    }
  }

  /// Releases every slot and ends the session. Idempotent.
  pub fn destroy(&mut self) {
    if self.state == ClientState::Destroyed {
      return;
    }
    for (operation, subscription) in self.slots.drain() {
      subscription.unsubscribe();
      debug!(%operation, "subscription released");
    }
    self.state = ClientState::Destroyed;
    debug!("client destroyed");
  }

  /// Starts the session and destroys it right away.
  pub fn run_once(&mut self) -> Result<(), ClientError> {
    let started = self.start();
    self.destroy();
    started
  }

  /// Number of subscription slots currently occupied.
  pub fn held_subscriptions(&self) -> usize {
    self.slots.len()
  }

  pub fn transcript(&self) -> &[Observation] {
    &self.transcript
  }

  /// Items observed for `operation` in its latest run, in arrival order.
  pub fn output(&self, operation: Operation) -> Vec<String> {
    self
      .transcript
      .iter()
      .filter(|o| o.operation == operation)
      .filter_map(|o| match &o.event {
        Event::Item(item) => Some(item.clone()),
        _ => None,
      })
      .collect()
  }

  /// The failure that ended the latest run of `operation`, if any.
  pub fn failure(&self, operation: Operation) -> Option<&SequenceError> {
    self
      .transcript
      .iter()
      .filter(|o| o.operation == operation)
      .find_map(|o| match &o.event {
        Event::Failed(error) => Some(error),
        _ => None,
      })
  }
}

impl Drop for Client {
  fn drop(&mut self) {
    self.destroy();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sequence::Sequence;
  use crate::substitutes::{FakeRepository, FAKE_DATA};
  use pretty_assertions::assert_eq;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// A repository whose sequences never complete and count their releases.
  #[derive(Default)]
  struct OpenRepository {
    released: Arc<AtomicUsize>,
  }

  impl OpenRepository {
    fn open(&self, item: &'static str) -> Sequence<String> {
      let released = Arc::clone(&self.released);
      Sequence::new(move |emitter| {
        let released = Arc::clone(&released);
        emitter.add_teardown(move || {
          released.fetch_add(1, Ordering::SeqCst);
        });
        emitter.next(item.to_string());
      })
    }
  }

  impl Repository for OpenRepository {
    fn fetch_hello_world(&self) -> Sequence<String> {
      self.open("hello")
    }

    fn fetch_john_doe(&self) -> Sequence<String> {
      self.open("john")
    }
  }

  #[test]
  fn start_issues_operations_in_order() {
    let mut client = Client::new(Arc::new(FakeRepository));
    client.start().unwrap();

    assert_eq!(client.state(), ClientState::Running);
    let operations: Vec<Operation> = client.transcript().iter().map(|o| o.operation).collect();
    assert_eq!(
      operations,
      vec![
        Operation::HelloWorld,
        Operation::HelloWorld,
        Operation::JohnDoe,
        Operation::JohnDoe
      ]
    );
    assert_eq!(client.output(Operation::JohnDoe), vec![FAKE_DATA]);
  }

  #[test]
  fn restarting_releases_the_previous_slot_first() {
    let repository = Arc::new(OpenRepository::default());
    let released = Arc::clone(&repository.released);
    let mut client = Client::new(repository);

    client.start().unwrap();
    assert_eq!(client.held_subscriptions(), 2);
    assert_eq!(released.load(Ordering::SeqCst), 0);

    client.start().unwrap();
    assert_eq!(client.held_subscriptions(), 2);
    assert_eq!(released.load(Ordering::SeqCst), 2);

    client.destroy();
    assert_eq!(client.held_subscriptions(), 0);
    assert_eq!(released.load(Ordering::SeqCst), 4);
  }

  #[test]
  fn rerunning_an_operation_replaces_its_transcript() {
    let mut client = Client::new(Arc::new(FakeRepository));
    client.start().unwrap();
    client.start().unwrap();
    client.show(Operation::JohnDoe).unwrap();

    assert_eq!(client.output(Operation::HelloWorld), vec![FAKE_DATA]);
    assert_eq!(client.output(Operation::JohnDoe), vec![FAKE_DATA]);
    assert_eq!(client.transcript().len(), 4);
    // JohnDoe ran last, so its entries come last.
    assert_eq!(client.transcript()[3].operation, Operation::JohnDoe);
    assert_eq!(client.transcript()[0].operation, Operation::HelloWorld);
  }

  #[test]
  fn release_twice_is_harmless() {
    let repository = Arc::new(OpenRepository::default());
    let released = Arc::clone(&repository.released);
    let mut client = Client::new(repository);
    client.show(Operation::HelloWorld).unwrap();

    assert!(client.release(Operation::HelloWorld));
    assert!(!client.release(Operation::HelloWorld));
    assert_eq!(released.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn destroyed_client_cannot_restart() {
    let mut client = Client::new(Arc::new(FakeRepository));
    client.destroy();
    client.destroy();

    assert_eq!(client.state(), ClientState::Destroyed);
    assert_eq!(client.start(), Err(ClientError::Destroyed));
    assert_eq!(client.show(Operation::JohnDoe), Err(ClientError::Destroyed));
  }

  #[test]
  fn dropping_releases_every_slot() {
    let repository = Arc::new(OpenRepository::default());
    let released = Arc::clone(&repository.released);
    {
      let mut client = Client::new(repository);
      client.start().unwrap();
    }
    assert_eq!(released.load(Ordering::SeqCst), 2);
  }
}
