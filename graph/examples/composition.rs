use std::path::PathBuf;
use wiring_graph::{Module, Operation, Wiring};

// Usage: cargo run -p wiring_graph --example composition -- [naive|shared|path/to/wiring.yaml]
fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let wiring = match std::env::args().nth(1) {
    None => Wiring::default(),
    Some(arg) if arg.ends_with(".yaml") || arg.ends_with(".yml") => {
      Wiring::from_file(&PathBuf::from(arg))?
    }
    Some(preset) => preset.parse()?,
  };
  println!("Wiring: source={}, repository={}", wiring.source, wiring.repository);

  let module = Module::new(wiring)?;

  let mut client_a = module.client()?;
  client_a.run_once()?;
  println!("1 Client: {} instances", module.census().total());

  let mut client_b = module.client()?;
  client_b.run_once()?;
  println!("2 Clients: {} instances", module.census().total());

  for operation in Operation::ALL {
    println!("{operation}: {:?}", client_b.output(operation));
  }
  Ok(())
}
