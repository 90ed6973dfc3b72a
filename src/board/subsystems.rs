// Optional on-board subsystems and their bring-up order
//
// One row per feature: stable name (diagnostics), the Kconfig symbol
// that enables it, and its rank. Ranks keep the classic board order:
// crypto engine first, pseudo filesystems, storage, timers, watchdog,
// input, flash, RTC, then the display and its framebuffer last.
// Gaps of 10 leave room for board-specific entries in between.

use super::config::BoardConfig;
use crate::kernel::registry::{InitStatus, RegistryBuilder, SubsystemEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    AesAccel,
    Procfs,
    Tmpfs,
    SdCard,
    Timer,
    RtTimer,
    Watchdog,
    Buttons,
    SpiFlash,
    Rtc,
    Display,
    Framebuffer,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::AesAccel,
        Feature::Procfs,
        Feature::Tmpfs,
        Feature::SdCard,
        Feature::Timer,
        Feature::RtTimer,
        Feature::Watchdog,
        Feature::Buttons,
        Feature::SpiFlash,
        Feature::Rtc,
        Feature::Display,
        Feature::Framebuffer,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Feature::AesAccel => "aes",
            Feature::Procfs => "procfs",
            Feature::Tmpfs => "tmpfs",
            Feature::SdCard => "sdcard",
            Feature::Timer => "timer",
            Feature::RtTimer => "rt_timer",
            Feature::Watchdog => "watchdog",
            Feature::Buttons => "buttons",
            Feature::SpiFlash => "spiflash",
            Feature::Rtc => "rtc",
            Feature::Display => "display",
            Feature::Framebuffer => "framebuffer",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Feature::AesAccel => "CONFIG_CRYPTO_AES_ACCEL",
            Feature::Procfs => "CONFIG_FS_PROCFS",
            Feature::Tmpfs => "CONFIG_FS_TMPFS",
            Feature::SdCard => "CONFIG_MMCSD",
            Feature::Timer => "CONFIG_TIMER",
            Feature::RtTimer => "CONFIG_RT_TIMER",
            Feature::Watchdog => "CONFIG_WATCHDOG",
            Feature::Buttons => "CONFIG_INPUT_BUTTONS",
            Feature::SpiFlash => "CONFIG_SPIFLASH",
            Feature::Rtc => "CONFIG_RTC_DRIVER",
            Feature::Display => "CONFIG_LCD_SSD1680",
            Feature::Framebuffer => "CONFIG_VIDEO_FB",
        }
    }

    pub const fn rank(self) -> i32 {
        match self {
            Feature::AesAccel => 0,
            Feature::Procfs => 10,
            Feature::Tmpfs => 20,
            Feature::SdCard => 30,
            Feature::Timer => 40,
            Feature::RtTimer => 50,
            Feature::Watchdog => 60,
            Feature::Buttons => 70,
            Feature::SpiFlash => 80,
            Feature::Rtc => 90,
            Feature::Display => 100,
            Feature::Framebuffer => 110,
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn enabled(self, config: &BoardConfig) -> bool {
        config.is_enabled(self.symbol())
    }

    /// Registry entry for this feature, gated by `config`.
    pub fn entry<'a, F>(self, config: &BoardConfig, init: F) -> SubsystemEntry<'a>
    where
        F: FnMut() -> InitStatus + 'a,
    {
        SubsystemEntry::new(self.name(), self.rank(), self.enabled(config), init)
    }
}

impl<'a> RegistryBuilder<'a> {
    /// Declare `feature`, enabled when its symbol is set in `config`.
    pub fn feature<F>(self, feature: Feature, config: &BoardConfig, init: F) -> Self
    where
        F: FnMut() -> InitStatus + 'a,
    {
        self.add(feature.entry(config, init))
    }
}
