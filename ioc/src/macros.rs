//! Public macros for terse resolution from an explicit container.

/// Resolves a contract from the given container.
///
/// Expands to a call on the container and evaluates to
/// `Result<Arc<_>, ResolveError>` (or `Rc<_>` for a `LocalContainer`), so it
/// composes with `?` inside factories.
///
/// # Examples
///
/// ```
/// use wiring_ioc::{resolve, Container, ResolveError};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// # fn main() -> Result<(), ResolveError> {
/// let container = Container::new();
/// container.add_singleton::<dyn Greeter>(|_| Ok(Arc::new(EnglishGreeter)))?;
/// container.add_instance_with_name("motd", Arc::new(String::from("hi")))?;
///
/// let greeter = resolve!(container, trait Greeter)?;
/// assert_eq!(greeter.greet(), "Hello!");
/// assert_eq!(*resolve!(container, String, "motd")?, "hi");
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! resolve {
  // Trait object arms come first: `trait` cannot start a type.
  ($container:expr, trait $trait_ident:ident) => {
    $container.resolve::<dyn $trait_ident>()
  };

  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container.resolve_named::<dyn $trait_ident>($name)
  };

  ($container:expr, $type:ty) => {
    $container.resolve::<$type>()
  };

  ($container:expr, $type:ty, $name:expr) => {
    $container.resolve_named::<$type>($name)
  };
}

/// Like [`resolve!`] but evaluates to an `Option`, discarding the error.
#[macro_export]
macro_rules! maybe_resolve {
  ($container:expr, trait $trait_ident:ident) => {
    $container.resolve::<dyn $trait_ident>().ok()
  };

  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container.resolve_named::<dyn $trait_ident>($name).ok()
  };

  ($container:expr, $type:ty) => {
    $container.resolve::<$type>().ok()
  };

  ($container:expr, $type:ty, $name:expr) => {
    $container.resolve_named::<$type>($name).ok()
  };
}
