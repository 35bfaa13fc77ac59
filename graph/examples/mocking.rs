use std::sync::Arc;
use wiring_graph::substitutes::{register_fake_source, FakeSource, FAKE_DATA};
use wiring_graph::{Module, Operation, Repository, SourceRepository, Wiring};
use wiring_ioc::Lifetime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().init();

  // Unit level: the repository with a fake source, no container involved.
  let repository = SourceRepository::new(Arc::new(FakeSource));
  let items = repository.fetch_hello_world().collect()?;
  println!("repository with fake source: {items:?}");
  assert_eq!(items, vec![FAKE_DATA]);

  // Graph level: production wiring with the source swapped out.
  let module = Module::new(Wiring::SHARED)?;
  register_fake_source(module.container(), Lifetime::Singleton)?;

  let mut client = module.client()?;
  client.run_once()?;
  println!("client output: {:?}", client.output(Operation::JohnDoe));
  println!("production sources built: {}", module.census().sources.count());
  Ok(())
}
