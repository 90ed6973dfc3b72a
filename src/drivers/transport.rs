// Bus transport for command/data style controllers
//
// Most panel controllers take a one-byte command followed by parameter
// bytes, with a D/C line telling the two apart. The driver core only
// sees Frames; how a frame reaches the wire is the transport's job.

use core::fmt;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    Command(u8),
    Data(&'a [u8]),
}

impl Frame<'_> {
    pub fn len(&self) -> usize {
        match self {
            Frame::Command(_) => 1,
            Frame::Data(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Synchronous, ordered byte transport. Frames written on one handle
/// reach the device in call order.
pub trait Transport {
    type Error: fmt::Debug;

    fn write(&mut self, frame: Frame<'_>) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    #[inline]
    fn write(&mut self, frame: Frame<'_>) -> Result<(), Self::Error> {
        (**self).write(frame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiTransportError<S, P> {
    Spi(S),
    Dc(P),
}

/// 4-wire SPI: an `SpiDevice` (owns CS) plus a D/C select line.
/// D/C low = command, high = data.
pub struct SpiTransport<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiTransport<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI, DC> Transport for SpiTransport<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = SpiTransportError<SPI::Error, DC::Error>;

    fn write(&mut self, frame: Frame<'_>) -> Result<(), Self::Error> {
        match frame {
            Frame::Command(cmd) => {
                self.dc.set_low().map_err(SpiTransportError::Dc)?;
                self.spi.write(&[cmd]).map_err(SpiTransportError::Spi)?;
                // idle with D/C high so stray clocks land as data
                self.dc.set_high().map_err(SpiTransportError::Dc)
            }
            Frame::Data(data) => {
                self.dc.set_high().map_err(SpiTransportError::Dc)?;
                if data.is_empty() {
                    return Ok(());
                }
                self.spi.write(data).map_err(SpiTransportError::Spi)
            }
        }
    }
}
