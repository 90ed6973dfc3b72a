// Hand-written fakes shared by the integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use bringup::drivers::{Capability, Frame, Transport};
use bringup::kernel::LogSink;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::Level;

/// Records every frame; optionally fails from the Nth write onwards.
#[derive(Default)]
pub struct CountingBus {
    pub writes: Vec<Vec<u8>>,
    pub commands: Vec<u8>,
    pub fail_after: Option<usize>,
}

impl CountingBus {
    pub fn ops(&self) -> usize {
        self.writes.len()
    }
}

impl Transport for CountingBus {
    type Error = &'static str;

    fn write(&mut self, frame: Frame<'_>) -> Result<(), Self::Error> {
        if self.fail_after.is_some_and(|n| self.writes.len() >= n) {
            return Err("bus fault");
        }
        match frame {
            Frame::Command(c) => {
                self.commands.push(c);
                self.writes.push(vec![c]);
            }
            Frame::Data(d) => self.writes.push(d.to_vec()),
        }
        Ok(())
    }
}

/// Capability with scripted line behaviour.
pub struct ScriptedLines {
    pub reset_ok: bool,
    pub busy_stuck: bool,
    pub busy_samples: usize,
    pub reset_calls: Vec<bool>,
}

impl ScriptedLines {
    pub fn healthy() -> Self {
        Self {
            reset_ok: true,
            busy_stuck: false,
            busy_samples: 0,
            reset_calls: Vec::new(),
        }
    }

    pub fn stuck() -> Self {
        Self {
            busy_stuck: true,
            ..Self::healthy()
        }
    }
}

impl Capability for ScriptedLines {
    fn power(&mut self, _on: bool) -> bool {
        true
    }

    fn reset(&mut self, asserted: bool) -> bool {
        self.reset_calls.push(asserted);
        self.reset_ok
    }

    fn busy(&mut self) -> bool {
        self.busy_samples += 1;
        self.busy_stuck
    }
}

/// Virtual clock: accumulates requested delay instead of sleeping.
#[derive(Default)]
pub struct VirtualClock {
    pub ns: u64,
}

impl VirtualClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.ns / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.ns += ns as u64;
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<(Level, String)>,
}

impl LogSink for RecordingSink {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        self.lines.push((level, args.to_string()));
    }
}

/// Output pin whose level is observable after it has been moved into
/// a driver.
#[derive(Clone, Default)]
pub struct SharedPin(pub Rc<RefCell<Vec<bool>>>);

impl SharedPin {
    pub fn history(&self) -> Vec<bool> {
        self.0.borrow().clone()
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl OutputPin for SharedPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(false);
        Ok(())
    }
}

/// BUSY input: idle (low), or held high forever when `stuck`.
pub struct BusyLine {
    pub stuck: bool,
}

impl ErrorType for BusyLine {
    type Error = Infallible;
}

impl InputPin for BusyLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.stuck)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.stuck)
    }
}

/// SPI bus that records every written byte.
#[derive(Clone, Default)]
pub struct RecordingSpi(pub Rc<RefCell<Vec<u8>>>);

impl embedded_hal::spi::ErrorType for RecordingSpi {
    type Error = Infallible;
}

impl embedded_hal::spi::SpiBus for RecordingSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        self.0.borrow_mut().extend_from_slice(words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        self.0.borrow_mut().extend_from_slice(write);
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        self.0.borrow_mut().extend_from_slice(words);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
