use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use wiring_ioc::{resolve, Container, Lifetime, ResolveError};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() -> Result<(), ResolveError> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let ids = Arc::new(AtomicUsize::new(0));
  let container = Container::new();

  // --- Singleton Registration ---
  // This factory will only be called ONCE.
  let singleton_ids = Arc::clone(&ids);
  container.register_with_name("singleton_tracker", Lifetime::Singleton, move |_| {
    println!("Creating SINGLETON RequestTracker...");
    Ok(Arc::new(RequestTracker {
      id: singleton_ids.fetch_add(1, Ordering::SeqCst),
    }))
  })?;

  // --- Transient Registration ---
  // This factory will be called EVERY time the service is resolved.
  let transient_ids = Arc::clone(&ids);
  container.register_with_name("transient_tracker", Lifetime::Transient, move |_| {
    println!("Creating TRANSIENT RequestTracker...");
    Ok(Arc::new(RequestTracker {
      id: transient_ids.fetch_add(1, Ordering::SeqCst),
    }))
  })?;

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(container, RequestTracker, "singleton_tracker")?;
  let s2 = resolve!(container, RequestTracker, "singleton_tracker")?;
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Resolving Transients ---");
  let t1 = resolve!(container, RequestTracker, "transient_tracker")?;
  let t2 = resolve!(container, RequestTracker, "transient_tracker")?;
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert!(!Arc::ptr_eq(&t1, &t2), "Transient instances should be different");
  Ok(())
}
