//! Board Support Package (BSP)
//!
//! Maps the board's physical hardware to named subsystems: which
//! features are enabled (config), the order they come up in
//! (subsystems), and how concrete pins are bound into driver
//! capabilities (pins, display). Drivers never see pin numbers.

pub mod config;
pub mod display;
pub mod pins;
pub mod subsystems;

pub use config::{BoardConfig, ConfigError, ConfigErrorKind, Setting};
pub use display::{DisplayHw, Epd, bring_up_display, bring_up_framebuffer};
pub use subsystems::Feature;
