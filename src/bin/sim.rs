// Host-side board simulator
//
// Boot sequence: resolve config -> bind simulated display hardware ->
// build registry -> bring-up -> print report
//
// Every subsystem except display/framebuffer is a stub that succeeds
// unless named with --fail NAME=CODE. The display runs the real SSD1680
// driver against simulated pins and an in-memory SPI bus, so a stuck
// BUSY line (--busy-stuck) exercises the genuine timeout path.
//
// Exit code is 0 even when subsystems fail: deciding whether a failure
// is fatal belongs to whoever launched the bring-up. 2 = bad input.

use std::cell::RefCell;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bringup::board::{self, BoardConfig, DisplayHw, Feature, pins};
use bringup::drivers::Timing;
use bringup::kernel::{ErrorCode, LogFacade, Registry};
use clap::Parser;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use embedded_hal_bus::spi::ExclusiveDevice;
use log::{error, info};

// every feature on; used when no --config is given
const DEFAULT_CONFIG: &str = "\
CONFIG_CRYPTO_AES_ACCEL=y
CONFIG_FS_PROCFS=y
CONFIG_FS_TMPFS=y
CONFIG_MMCSD=y
CONFIG_TIMER=y
CONFIG_RT_TIMER=y
CONFIG_WATCHDOG=y
CONFIG_INPUT_BUTTONS=y
CONFIG_SPIFLASH=y
CONFIG_RTC_DRIVER=y
CONFIG_LCD_SSD1680=y
CONFIG_VIDEO_FB=y
";

#[derive(Parser, Debug)]
#[command(name = "bringup-sim", about = "Run board bring-up against simulated hardware")]
struct Args {
    /// Kconfig `.config` file; all features enabled when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Make a subsystem fail, e.g. `--fail watchdog=5` (repeatable)
    #[arg(long = "fail", value_name = "NAME=CODE", value_parser = parse_failure)]
    failures: Vec<(Feature, i32)>,

    /// Hold the display BUSY line high forever
    #[arg(long)]
    busy_stuck: bool,

    /// Display busy-poll timeout in milliseconds
    #[arg(long, default_value_t = Timing::DEFAULT.busy_timeout_ms)]
    busy_timeout_ms: u32,
}

fn parse_failure(s: &str) -> Result<(Feature, i32), String> {
    let (name, code) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CODE, got `{}`", s))?;
    let feature =
        Feature::from_name(name).ok_or_else(|| format!("unknown subsystem `{}`", name))?;
    let code = code
        .parse::<i32>()
        .map_err(|e| format!("bad code `{}`: {}", code, e))?;
    if code == 0 {
        return Err("failure code must be nonzero".into());
    }
    Ok((feature, code))
}

// ── Simulated hardware ──────────────────────────────────────────────

struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

struct SimPin {
    name: &'static str,
    gpio: u8,
}

impl SimPin {
    fn new(name: &'static str, gpio: u8) -> Self {
        Self { name, gpio }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        log::trace!("[sim] GPIO{} ({}) high", self.gpio, self.name);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        log::trace!("[sim] GPIO{} ({}) low", self.gpio, self.name);
        Ok(())
    }
}

/// BUSY goes high after reset and drops after a few samples.
struct SimBusy {
    stuck: bool,
    samples: u32,
}

impl ErrorType for SimBusy {
    type Error = Infallible;
}

impl InputPin for SimBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        if self.stuck {
            return Ok(true);
        }
        self.samples = (self.samples + 1) % 4;
        Ok(self.samples != 0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

/// Write-only bus; the panel never answers.
struct SimSpi;

impl embedded_hal::spi::ErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiBus for SimSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        log::trace!("[sim] spi write {} bytes", words.len());
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        log::trace!("[sim] spi transfer {} bytes", write.len());
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&PathBuf>) -> Result<BoardConfig, String> {
    let text = match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| format!("cannot read {}: {}", p.display(), e))?,
        None => DEFAULT_CONFIG.to_string(),
    };
    BoardConfig::from_kconfig(&text).map_err(|e| format!("bad config: {}", e))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("booting...");

    let config = match load_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };
    info!(
        "config: {} symbols enabled",
        config.enabled_symbols().count()
    );

    info!(
        "[sim] SPI{} @ {} MHz: SCK={} MOSI={} CS={}",
        pins::EPD_SPI_HOST,
        pins::SPI_FREQ_MHZ,
        pins::SPI_SCK,
        pins::SPI_MOSI,
        pins::EPD_CS
    );
    info!(
        "[sim] EPD: DC={} RST={} BUSY={} PWR={}",
        pins::EPD_DC,
        pins::EPD_RST,
        pins::EPD_BUSY,
        pins::EPD_PWR
    );

    let cs = SimPin::new("EPD_CS", pins::EPD_CS);
    let spi = match ExclusiveDevice::new(SimSpi, cs, StdDelay) {
        Ok(dev) => dev,
        Err(e) => match e {},
    };
    let hw = DisplayHw {
        spi,
        dc: SimPin::new("EPD_DC", pins::EPD_DC),
        rst: SimPin::new("EPD_RST", pins::EPD_RST),
        busy: SimBusy {
            stuck: args.busy_stuck,
            samples: 0,
        },
        pwr: SimPin::new("EPD_PWR", pins::EPD_PWR),
    };
    let timing = Timing {
        busy_timeout_ms: args.busy_timeout_ms,
        ..Timing::DEFAULT
    };
    let epd_cell = RefCell::new(hw.into_epd(timing));
    let fb_cell = RefCell::new(epd_cell.borrow().framebuffer());
    let (epd, fb) = (&epd_cell, &fb_cell);

    let failures = &args.failures;
    let injected = move |feature: Feature| {
        failures
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|&(_, code)| ErrorCode(code))
    };

    let mut builder = Registry::builder();
    for feature in Feature::ALL {
        builder = match feature {
            Feature::Display => builder.feature(feature, &config, move || {
                if let Some(code) = injected(feature) {
                    return Err(code);
                }
                board::bring_up_display(&mut *epd.borrow_mut(), &mut StdDelay)
            }),
            Feature::Framebuffer => builder.feature(feature, &config, move || {
                if let Some(code) = injected(feature) {
                    return Err(code);
                }
                board::bring_up_framebuffer(
                    &mut *epd.borrow_mut(),
                    &mut *fb.borrow_mut(),
                    &mut StdDelay,
                )
            }),
            _ => builder.feature(feature, &config, move || match injected(feature) {
                Some(code) => Err(code),
                None => Ok(()),
            }),
        };
    }

    let mut registry = match builder.build() {
        Ok(r) => r,
        Err(e) => {
            error!("registry: {}", e);
            return ExitCode::from(2);
        }
    };

    let result = registry.run(&mut LogFacade);

    println!("attempted: {}", result.attempted().join(" "));
    for (name, code) in result.failures() {
        println!("failed:    {} ({})", name, code);
    }
    println!("display:   {:?}", epd_cell.borrow().state());
    println!("{}", result);

    ExitCode::SUCCESS
}
