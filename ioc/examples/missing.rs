use wiring_ioc::{resolve, Container, ResolveError};

struct UnregisteredService;

fn main() {
  let container = Container::new();

  println!("Attempting to resolve a service that was never registered...");
  match resolve!(container, UnregisteredService) {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err @ ResolveError::MissingBinding(_)) => println!("Correctly failed: {err}"),
    Err(other) => panic!("Unexpected error: {other}"),
  }

  // The non-failing lookup reports the same situation as `None`.
  assert!(container.get::<UnregisteredService>(None).is_none());
  println!("`get()` returned `None` for the missing service.");
}
