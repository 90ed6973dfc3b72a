//! E-paper wiring for the reference board
//!
//! Binds the board's concrete pins into a `PinCapability` and the SPI
//! device + D/C line into a `SpiTransport`, then hands both to the
//! board-independent SSD1680 driver. Pin numbers live in `pins` for
//! whoever configures the GPIOs; nothing here or below `drivers/` sees one.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::info;

use crate::drivers::{
    Framebuffer, NoPower, PanelDriver, PinCapability, RefreshMode, Ssd1680, SpiTransport, Timing,
};
use crate::kernel::registry::{ErrorCode, InitStatus};

pub use crate::drivers::ssd1680::{HEIGHT, WIDTH};

pub type Epd<SPI, DC, RST, BUSY, PWR = NoPower> =
    Ssd1680<SpiTransport<SPI, DC>, PinCapability<RST, BUSY, PWR>>;

/// Display subsystem hardware, still unbound.
pub struct DisplayHw<SPI, DC, RST, BUSY, PWR = NoPower> {
    pub spi: SPI,
    pub dc: DC,
    pub rst: RST,
    pub busy: BUSY,
    pub pwr: PWR,
}

impl<SPI, DC, RST, BUSY> DisplayHw<SPI, DC, RST, BUSY, NoPower>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Panel supply hard-wired on.
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            pwr: NoPower,
        }
    }
}

impl<SPI, DC, RST, BUSY, PWR> DisplayHw<SPI, DC, RST, BUSY, PWR>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
{
    /// Bind the pins and build the driver. Touches no hardware.
    pub fn into_epd(self, timing: Timing) -> Epd<SPI, DC, RST, BUSY, PWR> {
        let cap = PinCapability::with_power(self.rst, self.busy, self.pwr);
        let bus = SpiTransport::new(self.spi, self.dc);
        let core = PanelDriver::new(bus, cap)
            .with_timing(timing)
            .with_name("ssd1681");
        info!("[board] EPD bound: ssd1681 {}x{}", WIDTH, HEIGHT);
        Ssd1680::new(core)
    }
}

/// `display` subsystem initializer body.
pub fn bring_up_display<SPI, DC, RST, BUSY, PWR, D>(
    epd: &mut Epd<SPI, DC, RST, BUSY, PWR>,
    delay: &mut D,
) -> InitStatus
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
    D: DelayNs,
{
    epd.init(delay).map_err(ErrorCode::from)
}

/// `framebuffer` subsystem initializer body: blank the glass with a
/// full refresh so later partial updates start from a known frame.
pub fn bring_up_framebuffer<SPI, DC, RST, BUSY, PWR, D>(
    epd: &mut Epd<SPI, DC, RST, BUSY, PWR>,
    fb: &mut Framebuffer,
    delay: &mut D,
) -> InitStatus
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
    D: DelayNs,
{
    fb.clear_white();
    epd.update(fb, RefreshMode::Full, delay)
        .map_err(ErrorCode::from)
}
