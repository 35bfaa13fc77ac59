use std::sync::Arc;
use wiring_ioc::{resolve, Container, ResolveError};

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> Result<(), ResolveError> {
  let container = Container::new();

  // The container stores Arc<ConsoleLogger> but serves it as Arc<dyn Logger>.
  container.add_singleton::<dyn Logger>(|_| Ok(Arc::new(ConsoleLogger)))?;

  // ReportService does not create its logger, its factory resolves it.
  container.add_singleton(|c| {
    Ok(Arc::new(ReportService {
      logger: resolve!(c, trait Logger)?,
    }))
  })?;

  let report_service = resolve!(container, ReportService)?;
  report_service.generate_report();
  Ok(())
}
