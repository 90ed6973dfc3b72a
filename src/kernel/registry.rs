// Subsystem registry
//
// Entries are declared once at startup from resolved configuration and
// never mutated afterwards. `build()` is the only place a configuration
// error can surface (duplicate names); the built registry holds just the
// enabled entries, in run order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use log::{debug, error};

use super::bringup::{BringupResult, run_bringup};
use super::sink::LogSink;
use crate::error::{Error, Result};

/// Status code reported by a failing subsystem initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorCode(pub i32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Error> for ErrorCode {
    fn from(e: Error) -> Self {
        ErrorCode(e.code())
    }
}

pub type InitStatus = core::result::Result<(), ErrorCode>;

pub struct SubsystemEntry<'a> {
    name: &'static str,
    enabled: bool,
    priority_rank: i32,
    init: Box<dyn FnMut() -> InitStatus + 'a>,
}

impl<'a> SubsystemEntry<'a> {
    pub fn new<F>(name: &'static str, priority_rank: i32, enabled: bool, init: F) -> Self
    where
        F: FnMut() -> InitStatus + 'a,
    {
        Self {
            name,
            enabled,
            priority_rank,
            init: Box::new(init),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn priority_rank(&self) -> i32 {
        self.priority_rank
    }

    pub(crate) fn invoke(&mut self) -> InitStatus {
        (self.init)()
    }
}

impl fmt::Debug for SubsystemEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsystemEntry")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("priority_rank", &self.priority_rank)
            .finish_non_exhaustive()
    }
}

/// Collects entry declarations; `build()` validates and orders them.
#[derive(Debug, Default)]
pub struct RegistryBuilder<'a> {
    declared: Vec<SubsystemEntry<'a>>,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    pub fn add(mut self, entry: SubsystemEntry<'a>) -> Self {
        self.declared.push(entry);
        self
    }

    pub fn entry<F>(self, name: &'static str, priority_rank: i32, enabled: bool, init: F) -> Self
    where
        F: FnMut() -> InitStatus + 'a,
    {
        self.add(SubsystemEntry::new(name, priority_rank, enabled, init))
    }

    /// Number of declared entries, enabled or not.
    pub fn declared(&self) -> usize {
        self.declared.len()
    }

    /// Reject duplicate names (across every declared entry, disabled
    /// ones included), drop disabled entries, stable-sort by rank.
    pub fn build(self) -> Result<Registry<'a>> {
        for (i, a) in self.declared.iter().enumerate() {
            if self.declared[..i].iter().any(|b| b.name == a.name) {
                error!("[bringup] duplicate subsystem name `{}`", a.name);
                return Err(Error::DuplicateSubsystemName(a.name));
            }
        }

        let mut entries: Vec<_> = self.declared.into_iter().filter(|e| e.enabled).collect();
        // sort_by_key is stable: equal ranks keep declaration order
        entries.sort_by_key(|e| e.priority_rank);

        debug!("[bringup] registry built: {} enabled", entries.len());
        Ok(Registry { entries })
    }
}

/// Enabled entries in run order.
#[derive(Debug)]
pub struct Registry<'a> {
    entries: Vec<SubsystemEntry<'a>>,
}

impl<'a> Registry<'a> {
    pub fn builder() -> RegistryBuilder<'a> {
        RegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Run every entry once, in order. See [`run_bringup`].
    pub fn run<S: LogSink + ?Sized>(&mut self, sink: &mut S) -> BringupResult {
        run_bringup(&mut self.entries, sink)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::cell::Cell;

    use super::*;

    fn ok() -> InitStatus {
        Ok(())
    }

    #[test]
    fn build_drops_disabled_entries() {
        let reg = Registry::builder()
            .entry("timer", 0, true, ok)
            .entry("watchdog", 1, false, ok)
            .entry("display", 2, true, ok)
            .build()
            .unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["timer", "display"]);
    }

    #[test]
    fn build_orders_by_rank_then_declaration() {
        let reg = Registry::builder()
            .entry("rtc", 90, true, ok)
            .entry("b", 10, true, ok)
            .entry("a", 10, true, ok)
            .entry("aes", 0, true, ok)
            .build()
            .unwrap();
        assert_eq!(
            reg.names().collect::<Vec<_>>(),
            vec!["aes", "b", "a", "rtc"]
        );
    }

    #[test]
    fn duplicate_name_rejected_before_any_init() {
        let calls = Cell::new(0);
        let result = Registry::builder()
            .entry("display", 0, true, || {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .entry("display", 1, true, || {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .build();
        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateSubsystemName("display")
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn duplicate_among_disabled_entries_is_still_an_error() {
        let result = Registry::builder()
            .entry("rtc", 0, true, ok)
            .entry("rtc", 5, false, ok)
            .build();
        assert!(matches!(result, Err(Error::DuplicateSubsystemName("rtc"))));
    }

    #[test]
    fn empty_registry_builds() {
        let reg = Registry::builder().build().unwrap();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn driver_error_maps_to_its_code() {
        assert_eq!(ErrorCode::from(Error::TransportFailure), ErrorCode(-5));
    }
}
