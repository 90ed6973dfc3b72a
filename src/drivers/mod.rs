// Hardware drivers: chip-level and protocol-level, board-independent.
//
// Each module is reusable across boards; pin assignments and bus
// wiring live in board/ and arrive here as a Capability + Transport.

pub mod capability;
pub mod framebuffer;
pub mod panel;
pub mod ssd1680;
pub mod transport;

pub use capability::{Capability, NoPower, PinCapability};
pub use framebuffer::Framebuffer;
pub use panel::{DriverState, PanelDriver, Timing};
pub use ssd1680::{RefreshMode, Ssd1680};
pub use transport::{Frame, SpiTransport, SpiTransportError, Transport};
