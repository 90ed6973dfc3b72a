// Generic panel driver core (board-independent)
//
// Owns the bus, holds the board's Capability, and tracks a three-state
// lifecycle. Every wiring detail lives behind the Capability, so the same
// core serves any controller that exposes power/reset/busy over a bus.
//
//   Uninitialized --initialize ok--> Ready
//   Uninitialized/Ready --any control or bus failure--> Faulted
//   Faulted is terminal; rebuild the driver to recover.
//
// Construction touches no hardware. initialize() runs the fixed
// assert -> settle -> deassert -> busy-poll sequence; the poll is the
// only place the core blocks, bounded by Timing::busy_timeout_ms.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use super::capability::Capability;
use super::transport::{Frame, Transport};
use crate::error::{ControlLine, Error, Result};

const RESET_SETTLE_MS: u32 = 10;
const BUSY_TIMEOUT_MS: u32 = 2000;
const BUSY_POLL_MS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Hold time between asserting and releasing reset.
    pub reset_settle_ms: u32,
    /// Upper bound on any single busy-poll.
    pub busy_timeout_ms: u32,
    /// Sleep between BUSY samples; clamped to at least 1.
    pub poll_interval_ms: u32,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        reset_settle_ms: RESET_SETTLE_MS,
        busy_timeout_ms: BUSY_TIMEOUT_MS,
        poll_interval_ms: BUSY_POLL_MS,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Ready,
    Faulted,
}

pub struct PanelDriver<BUS, CAP> {
    bus: BUS,
    cap: CAP,
    state: DriverState,
    timing: Timing,
    name: &'static str,
}

impl<BUS, CAP> PanelDriver<BUS, CAP>
where
    BUS: Transport,
    CAP: Capability,
{
    /// Store the handles. No pin or bus activity happens here.
    pub fn new(bus: BUS, cap: CAP) -> Self {
        Self {
            bus,
            cap,
            state: DriverState::Uninitialized,
            timing: Timing::DEFAULT,
            name: "epd",
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = Timing {
            poll_interval_ms: timing.poll_interval_ms.max(1),
            ..timing
        };
        self
    }

    /// Name used in diagnostics.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Hardware reset then wait for the controller to come up.
    ///
    /// Allowed from `Uninitialized` and `Ready` (re-reset). A faulted
    /// driver stays faulted.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if self.state == DriverState::Faulted {
            warn!("[EPD] {}: initialize on faulted driver", self.name);
            return Err(Error::InvalidState);
        }

        if !self.cap.reset(true) {
            return Err(self.fault(Error::ControlLineFailure(ControlLine::Reset)));
        }
        delay.delay_ms(self.timing.reset_settle_ms);
        if !self.cap.reset(false) {
            return Err(self.fault(Error::ControlLineFailure(ControlLine::Reset)));
        }

        self.poll_busy(delay)?;

        self.state = DriverState::Ready;
        info!("[EPD] {} ready", self.name);
        Ok(())
    }

    /// Write one frame. Only valid once `Ready`; otherwise nothing is
    /// sent. A bus error faults the driver.
    pub fn transfer(&mut self, frame: Frame<'_>) -> Result<()> {
        if self.state != DriverState::Ready {
            warn!(
                "[EPD] {}: transfer in state {:?} rejected",
                self.name, self.state
            );
            return Err(Error::InvalidState);
        }

        if let Err(e) = self.bus.write(frame) {
            debug!("[EPD] {}: bus error {:?}", self.name, e);
            return Err(self.fault(Error::TransportFailure));
        }
        Ok(())
    }

    /// Command byte followed by its parameters (if any).
    pub fn command(&mut self, cmd: u8, data: &[u8]) -> Result<()> {
        self.transfer(Frame::Command(cmd))?;
        if !data.is_empty() {
            self.transfer(Frame::Data(data))?;
        }
        Ok(())
    }

    /// Bounded wait for BUSY to drop, e.g. after kicking a refresh.
    pub fn wait_ready<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if self.state != DriverState::Ready {
            return Err(Error::InvalidState);
        }
        self.poll_busy(delay)
    }

    /// Drive the supply line through the capability.
    pub fn set_power(&mut self, on: bool) -> Result<()> {
        if self.state == DriverState::Faulted {
            return Err(Error::InvalidState);
        }
        if !self.cap.power(on) {
            return Err(self.fault(Error::ControlLineFailure(ControlLine::Power)));
        }
        Ok(())
    }

    /// Tear down and hand the bus and capability back.
    pub fn release(self) -> (BUS, CAP) {
        (self.bus, self.cap)
    }

    fn poll_busy<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        let step = self.timing.poll_interval_ms;
        let mut waited: u32 = 0;
        loop {
            if !self.cap.busy() {
                return Ok(());
            }
            if waited >= self.timing.busy_timeout_ms {
                return Err(self.fault(Error::DeviceNotResponding));
            }
            delay.delay_ms(step);
            waited = waited.saturating_add(step);
        }
    }

    fn fault(&mut self, e: Error) -> Error {
        self.state = DriverState::Faulted;
        // the bring-up layer reports the failure itself
        warn!("[EPD] {}: {} (code {})", self.name, e, e.code());
        e
    }
}
