use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiring_graph::{
  Client, ClientError, ClientState, Module, Operation, Repository, Sequence, Wiring,
};

/// Records the order in which operations are fetched.
#[derive(Default)]
struct TracingRepository {
  calls: Mutex<Vec<Operation>>,
}

impl TracingRepository {
  fn take_calls(&self) -> Vec<Operation> {
    std::mem::take(&mut *self.calls.lock())
  }
}

impl Repository for TracingRepository {
  fn fetch_hello_world(&self) -> Sequence<String> {
    self.calls.lock().push(Operation::HelloWorld);
    Sequence::from_items(["a".to_string()])
  }

  fn fetch_john_doe(&self) -> Sequence<String> {
    self.calls.lock().push(Operation::JohnDoe);
    Sequence::from_items(["b".to_string()])
  }
}

#[test]
fn test_session_lifecycle() {
  let repository = Arc::new(TracingRepository::default());
  let mut client = Client::new(repository.clone());
  assert_eq!(client.state(), ClientState::Idle);

  client.start().unwrap();
  assert_eq!(client.state(), ClientState::Running);
  assert_eq!(
    repository.take_calls(),
    vec![Operation::HelloWorld, Operation::JohnDoe]
  );
  assert_eq!(client.held_subscriptions(), 2);

  client.destroy();
  assert_eq!(client.held_subscriptions(), 0);
  assert_eq!(client.state(), ClientState::Destroyed);

  // Destroying again is a no-op.
  client.destroy();
  assert_eq!(client.state(), ClientState::Destroyed);
  assert_eq!(client.start(), Err(ClientError::Destroyed));
  assert!(repository.take_calls().is_empty());
}

#[test]
fn test_destroy_from_idle() {
  let module = Module::new(Wiring::SHARED).unwrap();
  let mut client = module.client().unwrap();

  client.destroy();

  assert_eq!(client.state(), ClientState::Destroyed);
  assert!(client.transcript().is_empty());
}

#[test]
fn test_configured_operation_subset() {
  let repository = Arc::new(TracingRepository::default());
  let mut client = Client::with_operations(repository.clone(), [Operation::JohnDoe]);

  client.run_once().unwrap();

  assert_eq!(repository.take_calls(), vec![Operation::JohnDoe]);
  assert_eq!(client.output(Operation::JohnDoe), vec!["b"]);
  assert!(client.output(Operation::HelloWorld).is_empty());
}

#[test]
fn test_open_subscriptions_are_released_on_destroy() {
  struct Endless {
    released: Arc<AtomicUsize>,
  }

  impl Endless {
    fn open(&self) -> Sequence<String> {
      let released = Arc::clone(&self.released);
      Sequence::new(move |emitter| {
        let released = Arc::clone(&released);
        emitter.add_teardown(move || {
          released.fetch_add(1, Ordering::SeqCst);
        });
        emitter.next("still going".to_string());
      })
    }
  }

  impl Repository for Endless {
    fn fetch_hello_world(&self) -> Sequence<String> {
      self.open()
    }

    fn fetch_john_doe(&self) -> Sequence<String> {
      self.open()
    }
  }

  let released = Arc::new(AtomicUsize::new(0));
  let mut client = Client::new(Arc::new(Endless {
    released: Arc::clone(&released),
  }));

  client.start().unwrap();
  client.show(Operation::HelloWorld).unwrap();
  // Re-showing released the previous hello_world subscription.
  assert_eq!(released.load(Ordering::SeqCst), 1);

  client.destroy();
  client.destroy();
  assert_eq!(released.load(Ordering::SeqCst), 3);
}
