// Best-effort bring-up orchestrator
//
// Walks the entries in the order given and calls each initializer once.
// A failing subsystem is reported to the sink and recorded; the walk
// always continues. Whether any failure is fatal is the caller's call.
//
// No filtering here: entries arrive already filtered and sorted
// (RegistryBuilder::build). No dedup either: running twice calls every
// initializer twice.

use alloc::vec::Vec;
use core::fmt;

use log::{Level, debug, info};

use super::registry::{ErrorCode, SubsystemEntry};
use super::sink::LogSink;

/// Outcome of one bring-up run.
///
/// `failures` is always a subset of `attempted`, in the order they
/// happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BringupResult {
    attempted: Vec<&'static str>,
    failures: Vec<(&'static str, ErrorCode)>,
}

impl BringupResult {
    pub fn attempted(&self) -> &[&'static str] {
        &self.attempted
    }

    pub fn failures(&self) -> &[(&'static str, ErrorCode)] {
        &self.failures
    }

    /// Code the named subsystem failed with, if it failed.
    pub fn failure(&self, name: &str) -> Option<ErrorCode> {
        self.failures
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, code)| code)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attempted
            .iter()
            .copied()
            .filter(|name| self.failure(name).is_none())
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BringupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} failed",
            self.attempted.len(),
            self.failures.len()
        )?;
        for (i, (name, code)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { " (" } else { ", " };
            write!(f, "{}{}={}", sep, name, code)?;
        }
        if !self.failures.is_empty() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Invoke every entry's initializer in slice order.
///
/// Never fails and never short-circuits. Each failure produces exactly
/// one `Error`-level line on `sink` naming the subsystem and its code.
pub fn run_bringup<S: LogSink + ?Sized>(
    entries: &mut [SubsystemEntry<'_>],
    sink: &mut S,
) -> BringupResult {
    let mut result = BringupResult {
        attempted: Vec::with_capacity(entries.len()),
        failures: Vec::new(),
    };

    for entry in entries.iter_mut() {
        let name = entry.name();
        result.attempted.push(name);

        match entry.invoke() {
            Ok(()) => debug!("[bringup] {} ready", name),
            Err(code) => {
                sink.log(
                    Level::Error,
                    format_args!("[bringup] failed to initialize {}: {}", name, code),
                );
                result.failures.push((name, code));
            }
        }
    }

    info!("[bringup] done: {}", result);
    result
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::kernel::registry::{InitStatus, Registry};

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Level, String)>,
    }

    impl LogSink for Recorder {
        fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
            self.lines.push((level, format!("{}", args)));
        }
    }

    fn ok() -> InitStatus {
        Ok(())
    }

    #[test]
    fn failures_do_not_stop_the_walk() {
        let mut reg = Registry::builder()
            .entry("timer", 0, true, ok)
            .entry("watchdog", 1, true, || Err(ErrorCode(5)))
            .entry("display", 2, true, ok)
            .build()
            .unwrap();
        let mut sink = Recorder::default();

        let result = reg.run(&mut sink);

        assert_eq!(result.attempted(), &["timer", "watchdog", "display"]);
        assert_eq!(result.failures(), &[("watchdog", ErrorCode(5))]);
        assert_eq!(result.failure("watchdog"), Some(ErrorCode(5)));
        assert_eq!(result.failure("timer"), None);
        assert_eq!(
            result.succeeded().collect::<Vec<_>>(),
            vec!["timer", "display"]
        );
        assert!(!result.is_clean());
    }

    #[test]
    fn one_sink_line_per_failure() {
        let mut reg = Registry::builder()
            .entry("procfs", 0, true, || Err(ErrorCode(-2)))
            .entry("tmpfs", 1, true, ok)
            .entry("rtc", 2, true, || Err(ErrorCode(-19)))
            .build()
            .unwrap();
        let mut sink = Recorder::default();

        reg.run(&mut sink);

        assert_eq!(sink.lines.len(), 2);
        assert!(sink.lines.iter().all(|(lvl, _)| *lvl == Level::Error));
        assert!(sink.lines[0].1.contains("procfs"));
        assert!(sink.lines[0].1.contains("-2"));
        assert!(sink.lines[1].1.contains("rtc"));
        assert!(sink.lines[1].1.contains("-19"));
    }

    #[test]
    fn clean_run_logs_nothing_to_sink() {
        let mut reg = Registry::builder()
            .entry("timer", 0, true, ok)
            .build()
            .unwrap();
        let mut sink = Recorder::default();

        let result = reg.run(&mut sink);

        assert!(result.is_clean());
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn second_run_invokes_every_initializer_again() {
        let calls = RefCell::new(Vec::new());
        let mut reg = Registry::builder()
            .entry("timer", 0, true, || {
                calls.borrow_mut().push("timer");
                Ok(())
            })
            .entry("rtc", 1, true, || {
                calls.borrow_mut().push("rtc");
                Ok(())
            })
            .build()
            .unwrap();
        let mut sink = Recorder::default();

        let first = reg.run(&mut sink);
        let second = reg.run(&mut sink);

        assert_eq!(first, second);
        assert_eq!(*calls.borrow(), vec!["timer", "rtc", "timer", "rtc"]);
    }

    #[test]
    fn summary_lists_failures_in_order() {
        let mut reg = Registry::builder()
            .entry("a", 0, true, || Err(ErrorCode(1)))
            .entry("b", 1, true, ok)
            .entry("c", 2, true, || Err(ErrorCode(3)))
            .build()
            .unwrap();

        let result = reg.run(&mut Recorder::default());

        assert_eq!(format!("{}", result), "3 attempted, 2 failed (a=1, c=3)");
    }

    #[test]
    fn empty_slice_yields_empty_result() {
        let result = run_bringup(&mut [], &mut Recorder::default());
        assert!(result.attempted().is_empty());
        assert!(result.is_clean());
        assert_eq!(format!("{}", result), "0 attempted, 0 failed");
    }
}
