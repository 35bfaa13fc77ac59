//! A finite, push-based sequence and the subscription handle that releases it.
//!
//! A [`Sequence`] is cold: every subscription runs the producer again from the
//! start. Emission is synchronous, so by the time [`Sequence::subscribe`]
//! returns the producer has pushed everything it is going to push. A producer
//! that never signals completion leaves its [`Subscription`] open until it is
//! released.

use crate::error::SequenceError;
use parking_lot::Mutex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

type Teardown = Box<dyn FnOnce() + Send>;
type Producer<T> = dyn Fn(&mut Emitter<'_, T>) + Send + Sync;

struct SubscriptionState {
  closed: AtomicBool,
  teardowns: Mutex<Vec<Teardown>>,
}

impl SubscriptionState {
  fn new() -> Self {
    Self {
      closed: AtomicBool::new(false),
      teardowns: Mutex::new(Vec::new()),
    }
  }

  fn is_closed(&self) -> bool {
    self.closed.load(Ordering::Acquire)
  }

  /// Closes the subscription and runs its teardowns. Returns `false` if it was
  /// already closed, in which case nothing runs.
  fn close(&self) -> bool {
    if self.closed.swap(true, Ordering::AcqRel) {
      return false;
    }
    let teardowns = std::mem::take(&mut *self.teardowns.lock());
    for teardown in teardowns {
      teardown();
    }
    true
  }
}

/// Handle to one consumption of a [`Sequence`].
///
/// Releasing is idempotent. Dropping the handle releases it.
pub struct Subscription {
  state: Arc<SubscriptionState>,
}

impl Subscription {
  /// Releases the subscription. Returns `true` only for the call that actually
  /// released it; releasing an already closed subscription is a no-op.
  pub fn unsubscribe(&self) -> bool {
    self.state.close()
  }

  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.state.close();
  }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("closed", &self.is_closed())
      .finish()
  }
}

/// Receives the signals of a subscribed [`Sequence`].
pub trait Observer<T> {
  fn on_next(&mut self, item: T);

  fn on_error(&mut self, error: SequenceError) {
    warn!(%error, "unhandled sequence failure");
  }

  fn on_complete(&mut self) {}
}

impl<T, O: Observer<T> + ?Sized> Observer<T> for &mut O {
  fn on_next(&mut self, item: T) {
    (**self).on_next(item)
  }

  fn on_error(&mut self, error: SequenceError) {
    (**self).on_error(error)
  }

  fn on_complete(&mut self) {
    (**self).on_complete()
  }
}

struct FnObserver<F>(F);

impl<T, F: FnMut(T)> Observer<T> for FnObserver<F> {
  fn on_next(&mut self, item: T) {
    (self.0)(item)
  }
}

/// The producer side of a subscription.
///
/// Signals sent after a terminal signal, or after the subscription was
/// released, are dropped.
pub struct Emitter<'a, T> {
  observer: &'a mut dyn Observer<T>,
  state: &'a SubscriptionState,
}

impl<T> Emitter<'_, T> {
  /// Pushes an item. Returns whether the subscription is still open afterwards.
  pub fn next(&mut self, item: T) -> bool {
    if self.state.is_closed() {
      return false;
    }
    self.observer.on_next(item);
    !self.state.is_closed()
  }

  pub fn complete(&mut self) {
    if self.state.is_closed() {
      return;
    }
    self.observer.on_complete();
    self.state.close();
  }

  pub fn error(&mut self, error: SequenceError) {
    if self.state.is_closed() {
      return;
    }
    self.observer.on_error(error);
    self.state.close();
  }

  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }

  /// Registers cleanup to run exactly once when the subscription closes. Runs
  /// immediately if it is already closed.
  pub fn add_teardown(&mut self, teardown: impl FnOnce() + Send + 'static) {
    let mut teardowns = self.state.teardowns.lock();
    if self.state.is_closed() {
      drop(teardowns);
      teardown();
    } else {
      teardowns.push(Box::new(teardown));
    }
  }
}

/// A lazy, finite sequence of `T` terminated by completion or failure.
pub struct Sequence<T> {
  producer: Arc<Producer<T>>,
}

impl<T> Clone for Sequence<T> {
  fn clone(&self) -> Self {
    Self {
      producer: Arc::clone(&self.producer),
    }
  }
}

impl<T> fmt::Debug for Sequence<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Sequence(..)")
  }
}

impl<T: 'static> Sequence<T> {
  pub fn new(producer: impl Fn(&mut Emitter<'_, T>) + Send + Sync + 'static) -> Self {
    Self {
      producer: Arc::new(producer),
    }
  }

  /// Emits each item in order, then completes.
  pub fn from_items(items: impl IntoIterator<Item = T>) -> Self
  where
    T: Clone + Send + Sync,
  {
    let items: Vec<T> = items.into_iter().collect();
    Self::new(move |emitter| {
      for item in &items {
        if !emitter.next(item.clone()) {
          return;
        }
      }
      emitter.complete();
    })
  }

  pub fn empty() -> Self {
    Self::new(|emitter| emitter.complete())
  }

  /// Emits `error` immediately.
  pub fn failed(error: SequenceError) -> Self {
    Self::new(move |emitter| emitter.error(error.clone()))
  }

  /// Applies `f` to every item, passing completion and failure through.
  ///
  /// The upstream producer runs on the mapped subscription itself: its
  /// teardowns run when the mapped subscription is released, and it sees the
  /// subscription as closed as soon as the downstream is.
  pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Sequence<U> {
    let upstream = Arc::clone(&self.producer);
    let f = Arc::new(f);
    Sequence::<U>::new(move |emitter| {
      let state = emitter.state;
      let mut forward = Forward {
        downstream: emitter,
        f: &*f,
        _item: PhantomData,
      };
      let mut upstream_emitter = Emitter {
        observer: &mut forward,
        state,
      };
      upstream(&mut upstream_emitter);
    })
  }

  pub fn subscribe(&self, on_next: impl FnMut(T)) -> Subscription {
    self.subscribe_with(FnObserver(on_next))
  }

  /// Runs the producer against `observer` and returns the handle for this
  /// consumption.
  pub fn subscribe_with<O: Observer<T>>(&self, mut observer: O) -> Subscription {
    let state = Arc::new(SubscriptionState::new());
    {
      let mut emitter = Emitter {
        observer: &mut observer,
        state: &*state,
      };
      (self.producer)(&mut emitter);
    }
    Subscription { state }
  }

  /// Drains the sequence into a vector, or returns its failure.
  pub fn collect(&self) -> Result<Vec<T>, SequenceError> {
    let mut collector = Collector {
      items: Vec::new(),
      error: None,
    };
    let _subscription = self.subscribe_with(&mut collector);
    match collector.error {
      Some(error) => Err(error),
      None => Ok(collector.items),
    }
  }
}

struct Forward<'e, 'a, T, U, F: ?Sized> {
  downstream: &'e mut Emitter<'a, U>,
  f: &'e F,
  _item: PhantomData<fn(T)>,
}

impl<T, U, F: Fn(T) -> U + ?Sized> Observer<T> for Forward<'_, '_, T, U, F> {
  fn on_next(&mut self, item: T) {
    self.downstream.next((self.f)(item));
  }

  fn on_error(&mut self, error: SequenceError) {
    self.downstream.error(error);
  }

  fn on_complete(&mut self) {
    self.downstream.complete();
  }
}

struct Collector<T> {
  items: Vec<T>,
  error: Option<SequenceError>,
}

impl<T> Observer<T> for Collector<T> {
  fn on_next(&mut self, item: T) {
    self.items.push(item);
  }

  fn on_error(&mut self, error: SequenceError) {
    self.error = Some(error);
  }
}
