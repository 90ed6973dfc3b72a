// Bring-up core: registry of subsystem initializers and the orchestrator
// that walks it. Synchronous, single-threaded, runs once before anything
// else is scheduled.

pub mod bringup;
pub mod registry;
pub mod sink;

pub use bringup::{BringupResult, run_bringup};
pub use registry::{ErrorCode, InitStatus, Registry, RegistryBuilder, SubsystemEntry};
pub use sink::{LogFacade, LogSink};
