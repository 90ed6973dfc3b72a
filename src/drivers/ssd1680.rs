// SSD1680/SSD1681 e-paper controller (board-independent)
//
// Command layer on top of PanelDriver: every byte goes through the
// core's transfer(), every wait through its bounded busy poll, so a
// stuck panel faults the core instead of hanging the caller.
//
// Refresh follows the usual SSD16xx two-plane scheme: BW RAM holds the
// new frame, RED RAM the previous one. Full refresh bypasses RED (GC
// waveform); partial refresh diffs against it, then RED is synced.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::capability::Capability;
use super::framebuffer::Framebuffer;
use super::panel::{DriverState, PanelDriver};
use super::transport::Transport;
use crate::error::{Error, Result};

// GDEY0154D67 (SSD1681, 200x200)
pub const WIDTH: u16 = 200;
pub const HEIGHT: u16 = 200;

// RAM X addresses are one byte of 8-pixel columns
pub const MAX_WIDTH: u16 = 256 * 8;

#[allow(dead_code)]
mod cmd {
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMPERATURE_SENSOR: u8 = 0x18;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CONTROL_1: u8 = 0x21;
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_RAM_BW: u8 = 0x24; // current/new buffer
    pub const WRITE_RAM_RED: u8 = 0x26; // previous buffer (differential)
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const SET_RAM_X_RANGE: u8 = 0x44;
    pub const SET_RAM_Y_RANGE: u8 = 0x45;
    pub const SET_RAM_X_COUNTER: u8 = 0x4E;
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshMode {
    #[default]
    Full,
    Partial,
}

pub struct Ssd1680<BUS, CAP> {
    core: PanelDriver<BUS, CAP>,
    width: u16,
    height: u16,
    initial_refresh: bool,
}

impl<BUS, CAP> Ssd1680<BUS, CAP>
where
    BUS: Transport,
    CAP: Capability,
{
    pub fn new(core: PanelDriver<BUS, CAP>) -> Self {
        Self {
            core,
            width: WIDTH,
            height: HEIGHT,
            initial_refresh: true,
        }
    }

    /// Panel of another size. Both sides must be nonzero and the width
    /// must fit the controller's X address range.
    pub fn with_geometry(core: PanelDriver<BUS, CAP>, width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_WIDTH {
            warn!(
                "[EPD] {}: unsupported geometry {}x{}",
                core.name(),
                width,
                height
            );
            return Err(Error::InvalidState);
        }
        Ok(Self {
            core,
            width,
            height,
            initial_refresh: true,
        })
    }

    /// Framebuffer matching this panel.
    pub fn framebuffer(&self) -> Framebuffer {
        Framebuffer::new(self.width, self.height)
    }

    pub fn state(&self) -> DriverState {
        self.core.state()
    }

    pub fn core_mut(&mut self) -> &mut PanelDriver<BUS, CAP> {
        &mut self.core
    }

    pub fn release(self) -> PanelDriver<BUS, CAP> {
        self.core
    }

    /// Power, hardware reset, then the controller register setup.
    /// Also the way back out of deep sleep.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.core.set_power(true)?;
        self.core.initialize(delay)?;

        self.core.command(cmd::SW_RESET, &[])?;
        delay.delay_ms(10);
        self.core.wait_ready(delay)?;

        let last_gate = self.height - 1;
        self.core.command(
            cmd::DRIVER_OUTPUT_CONTROL,
            &[(last_gate & 0xFF) as u8, (last_gate >> 8) as u8, 0x00],
        )?;

        // X increment, Y increment
        self.core.command(cmd::DATA_ENTRY_MODE, &[0x03])?;
        self.set_ram_area(0, 0, self.width, self.height)?;

        self.core.command(cmd::BORDER_WAVEFORM, &[0x05])?;
        // internal temperature sensor
        self.core.command(cmd::TEMPERATURE_SENSOR, &[0x80])?;
        self.core.wait_ready(delay)?;

        self.initial_refresh = true;
        info!("[EPD] {} {}x{} initialized", self.core.name(), self.width, self.height);
        Ok(())
    }

    /// Load a frame into BW RAM. Does not refresh the glass.
    pub fn write_frame(&mut self, fb: &Framebuffer) -> Result<()> {
        self.write_plane(cmd::WRITE_RAM_BW, fb)
    }

    /// Kick an update of whatever BW RAM holds and wait for it.
    /// The first refresh after init is always full.
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> Result<()> {
        let mode = if self.initial_refresh {
            RefreshMode::Full
        } else {
            mode
        };

        match mode {
            RefreshMode::Full => {
                // bypass RED as 0, BW normal
                self.core.command(cmd::DISPLAY_UPDATE_CONTROL_1, &[0x40, 0x00])?;
                self.core.command(cmd::DISPLAY_UPDATE_CONTROL_2, &[0xF7])?;
            }
            RefreshMode::Partial => {
                self.core.command(cmd::DISPLAY_UPDATE_CONTROL_1, &[0x00, 0x00])?;
                self.core.command(cmd::DISPLAY_UPDATE_CONTROL_2, &[0xFC])?;
            }
        }
        self.core.command(cmd::MASTER_ACTIVATION, &[])?;
        self.core.wait_ready(delay)?;

        self.initial_refresh = false;
        Ok(())
    }

    /// Write, refresh, then sync RED RAM so the next partial refresh
    /// diffs against what is on the glass.
    pub fn update<D: DelayNs>(
        &mut self,
        fb: &mut Framebuffer,
        mode: RefreshMode,
        delay: &mut D,
    ) -> Result<()> {
        self.write_frame(fb)?;
        self.refresh(mode, delay)?;
        self.write_plane(cmd::WRITE_RAM_RED, fb)?;
        fb.mark_clean();
        Ok(())
    }

    /// Deep sleep mode 1 (RAM retained). Needs `init` to wake.
    pub fn sleep(&mut self) -> Result<()> {
        self.core.command(cmd::DEEP_SLEEP, &[0x01])
    }

    /// Cut the panel supply through the board's power line.
    pub fn power_off(&mut self) -> Result<()> {
        self.core.set_power(false)
    }

    fn write_plane(&mut self, ram_cmd: u8, fb: &Framebuffer) -> Result<()> {
        if fb.width() != self.width || fb.height() != self.height {
            warn!(
                "[EPD] {}: frame {}x{} does not match panel {}x{}",
                self.core.name(),
                fb.width(),
                fb.height(),
                self.width,
                self.height
            );
            return Err(Error::InvalidState);
        }
        self.set_ram_area(0, 0, self.width, self.height)?;
        self.core.command(ram_cmd, fb.data())
    }

    // X in bytes, Y in gate lines
    fn set_ram_area(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<()> {
        let x_end = x + w - 1;
        let y_end = y + h - 1;

        self.core
            .command(cmd::SET_RAM_X_RANGE, &[(x / 8) as u8, (x_end / 8) as u8])?;
        self.core.command(
            cmd::SET_RAM_Y_RANGE,
            &[
                (y & 0xFF) as u8,
                (y >> 8) as u8,
                (y_end & 0xFF) as u8,
                (y_end >> 8) as u8,
            ],
        )?;
        self.core.command(cmd::SET_RAM_X_COUNTER, &[(x / 8) as u8])?;
        self.core
            .command(cmd::SET_RAM_Y_COUNTER, &[(y & 0xFF) as u8, (y >> 8) as u8])
    }
}
