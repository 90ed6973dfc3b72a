// Board bring-up sequencer and capability-injected peripheral drivers
//
// kernel/  - subsystem registry + best-effort bring-up orchestrator
// drivers/ - board-independent drivers; wiring arrives as a Capability
// board/   - feature table, resolved config, pin bindings

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod board;
pub mod drivers;
pub mod error;
pub mod kernel;

pub use error::{ControlLine, Error, Result};
