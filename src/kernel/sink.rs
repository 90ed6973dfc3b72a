// Diagnostic sink for bring-up failures
//
// The orchestrator decides *what* to report; the sink decides where it
// goes. LogFacade hands everything to the `log` crate, so the output
// ends up wherever the board installed its logger.

use core::fmt;

use log::Level;

pub trait LogSink {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>);
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    #[inline]
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        (**self).log(level, args)
    }
}

/// Forwards to the global `log` logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl LogSink for LogFacade {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: "bringup", level, "{}", args);
    }
}
