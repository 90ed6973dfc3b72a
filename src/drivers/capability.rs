// Board-supplied control lines for a peripheral driver
//
// A driver core never touches GPIO directly. The board binds its power,
// reset and busy lines into a Capability once, hands it to exactly one
// driver, and the driver calls through it during init and transfers.
//
// Contract for implementors:
// - every call returns quickly and never blocks on unrelated I/O
// - busy() only samples the line; safe to poll in a tight loop
// - reset(true/false) is valid at any time, including before power(true)

use embedded_hal::digital::{InputPin, OutputPin};

pub trait Capability {
    /// Switch the peripheral supply. `false` means the line could not be driven.
    fn power(&mut self, on: bool) -> bool;

    /// Drive the reset line; `asserted = true` holds the device in reset.
    fn reset(&mut self, asserted: bool) -> bool;

    /// `true` while the device reports busy.
    fn busy(&mut self) -> bool;
}

impl<C: Capability + ?Sized> Capability for &mut C {
    #[inline]
    fn power(&mut self, on: bool) -> bool {
        (**self).power(on)
    }

    #[inline]
    fn reset(&mut self, asserted: bool) -> bool {
        (**self).reset(asserted)
    }

    #[inline]
    fn busy(&mut self) -> bool {
        (**self).busy()
    }
}

/// Placeholder for boards where the panel supply is not switchable.
/// Always reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPower;

impl embedded_hal::digital::ErrorType for NoPower {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPower {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Capability closed over owned embedded-hal pins.
///
/// Reset is active-low (asserted = pin low), BUSY is active-high, the
/// power enable is active-high. A pin error reads as failure; a BUSY
/// read error reads as busy so a broken line ends in a timeout rather
/// than a false "ready".
pub struct PinCapability<RST, BUSY, PWR = NoPower> {
    rst: RST,
    busy: BUSY,
    pwr: PWR,
}

impl<RST, BUSY> PinCapability<RST, BUSY, NoPower>
where
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(rst: RST, busy: BUSY) -> Self {
        Self {
            rst,
            busy,
            pwr: NoPower,
        }
    }
}

impl<RST, BUSY, PWR> PinCapability<RST, BUSY, PWR>
where
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
{
    pub fn with_power(rst: RST, busy: BUSY, pwr: PWR) -> Self {
        Self { rst, busy, pwr }
    }

    /// Give the pins back to the board.
    pub fn release(self) -> (RST, BUSY, PWR) {
        (self.rst, self.busy, self.pwr)
    }
}

impl<RST, BUSY, PWR> Capability for PinCapability<RST, BUSY, PWR>
where
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
{
    fn power(&mut self, on: bool) -> bool {
        if on {
            self.pwr.set_high().is_ok()
        } else {
            self.pwr.set_low().is_ok()
        }
    }

    fn reset(&mut self, asserted: bool) -> bool {
        if asserted {
            self.rst.set_low().is_ok()
        } else {
            self.rst.set_high().is_ok()
        }
    }

    fn busy(&mut self) -> bool {
        self.busy.is_high().unwrap_or(true)
    }
}
