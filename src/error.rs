// Crate-wide error taxonomy
//
// Subsystem init failures are not errors here: they are plain codes
// aggregated into a BringupResult (see kernel::bringup).

use core::fmt;

use thiserror::Error;

/// Which capability control line reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLine {
    Power,
    Reset,
}

impl fmt::Display for ControlLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlLine::Power => write!(f, "power"),
            ControlLine::Reset => write!(f, "reset"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// BUSY never dropped within the configured timeout.
    #[error("device not responding")]
    DeviceNotResponding,
    /// Operation issued in a state that does not allow it.
    #[error("invalid driver state")]
    InvalidState,
    /// The bus reported an I/O failure.
    #[error("transport failure")]
    TransportFailure,
    /// A capability power/reset operation reported failure.
    #[error("{0} control line failure")]
    ControlLineFailure(ControlLine),
    /// Two registry entries declared with the same name.
    #[error("duplicate subsystem name `{0}`")]
    DuplicateSubsystemName(&'static str),
}

impl Error {
    /// Stable numeric code for diagnostics (negative, errno-like).
    pub const fn code(&self) -> i32 {
        match self {
            Error::DeviceNotResponding => -110, // ETIMEDOUT
            Error::InvalidState => -1,          // EPERM
            Error::TransportFailure => -5,      // EIO
            Error::ControlLineFailure(_) => -19, // ENODEV
            Error::DuplicateSubsystemName(_) => -17, // EEXIST
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_cause() {
        assert_eq!(
            Error::DuplicateSubsystemName("rtc").to_string(),
            "duplicate subsystem name `rtc`"
        );
        assert_eq!(
            Error::ControlLineFailure(ControlLine::Reset).to_string(),
            "reset control line failure"
        );
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            Error::DeviceNotResponding,
            Error::InvalidState,
            Error::TransportFailure,
            Error::ControlLineFailure(ControlLine::Power),
            Error::DuplicateSubsystemName("x"),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
