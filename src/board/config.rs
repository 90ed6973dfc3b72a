//! Resolved board configuration
//!
//! The set of enabled features is decided once, before the registry is
//! built, and never changes afterwards. It can be assembled in code or
//! read from a Kconfig `.config` file:
//!
//! ```text
//! CONFIG_TIMER=y
//! CONFIG_WATCHDOG=m
//! # CONFIG_RTC_DRIVER is not set
//! CONFIG_LIBC_TMPDIR="/tmp"
//! ```

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// `=y`
    Enabled,
    /// `=m`; counts as enabled
    Module,
    /// `=n` or `# ... is not set`
    Disabled,
    /// anything else: strings, numbers, hex
    Value(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigErrorKind {
    #[error("expected CONFIG_<NAME>=<value>")]
    MissingValue,
    #[error("invalid symbol name")]
    BadSymbol,
    #[error("unterminated string")]
    UnterminatedString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ConfigError {
    /// 1-based
    pub line: usize,
    pub kind: ConfigErrorKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardConfig {
    settings: BTreeMap<String, Setting>,
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kconfig(text: &str) -> Result<Self, ConfigError> {
        let mut cfg = Self::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let err = |kind| ConfigError { line: i + 1, kind };

            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(sym) = comment
                    .trim()
                    .strip_suffix("is not set")
                    .map(str::trim)
                    .filter(|s| is_symbol(s))
                {
                    cfg.settings.insert(sym.to_string(), Setting::Disabled);
                }
                continue;
            }

            let (sym, value) = line.split_once('=').ok_or(err(ConfigErrorKind::MissingValue))?;
            let sym = sym.trim();
            if !is_symbol(sym) {
                return Err(err(ConfigErrorKind::BadSymbol));
            }

            let setting = match value.trim() {
                "y" => Setting::Enabled,
                "m" => Setting::Module,
                "n" => Setting::Disabled,
                v if v.starts_with('"') => {
                    Setting::Value(unquote(v).ok_or(err(ConfigErrorKind::UnterminatedString))?)
                }
                v => Setting::Value(v.to_string()),
            };
            cfg.settings.insert(sym.to_string(), setting);
        }

        Ok(cfg)
    }

    pub fn enable(mut self, sym: &str) -> Self {
        self.settings.insert(sym.to_string(), Setting::Enabled);
        self
    }

    pub fn disable(mut self, sym: &str) -> Self {
        self.settings.insert(sym.to_string(), Setting::Disabled);
        self
    }

    pub fn set(mut self, sym: &str, value: &str) -> Self {
        self.settings
            .insert(sym.to_string(), Setting::Value(value.to_string()));
        self
    }

    pub fn setting(&self, sym: &str) -> Option<&Setting> {
        self.settings.get(sym)
    }

    /// `y` or `m`. Unknown symbols are disabled.
    pub fn is_enabled(&self, sym: &str) -> bool {
        matches!(
            self.settings.get(sym),
            Some(Setting::Enabled | Setting::Module)
        )
    }

    pub fn value(&self, sym: &str) -> Option<&str> {
        match self.settings.get(sym) {
            Some(Setting::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn has_all(&self, syms: &[&str]) -> bool {
        syms.iter().all(|s| self.is_enabled(s))
    }

    pub fn enabled_symbols(&self) -> impl Iterator<Item = &str> {
        self.settings
            .iter()
            .filter(|(_, s)| matches!(s, Setting::Enabled | Setting::Module))
            .map(|(k, _)| k.as_str())
    }
}

fn is_symbol(s: &str) -> bool {
    s.strip_prefix("CONFIG_").is_some_and(|name| {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

// "..." with \" and \\ escapes
fn unquote(v: &str) -> Option<String> {
    let body = v.strip_prefix('"')?;
    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return chars.as_str().trim().is_empty().then_some(out),
            '\\' => out.push(chars.next()?),
            c => out.push(c),
        }
    }
    None
}
