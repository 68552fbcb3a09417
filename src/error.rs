//! Regulator error types
//!
//! Only the configuration surface can fail. The periodic control path
//! degrades to "produce zero or skip" instead of returning errors.

use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Control period is not a positive, finite number of seconds
    InvalidPeriod,
    /// A gain, offset or reference is not finite
    InvalidGains,
    /// Reference weights (beta, gamma) outside [0, 1]
    InvalidWeights,
    /// Saturation bounds are not finite or max <= min
    InvalidSaturation,
    /// Filter order outside 1..=MAX_FILTER_ORDER or coefficient count mismatch
    FilterOrder,
    /// Filter coefficient is not finite, or leading feedback coefficient is zero
    FilterCoefficients,
    /// Byte does not name a regulator mode
    UnknownMode(u8),
    /// Telemetry record does not fit its buffer
    RecordOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPeriod => write!(f, "invalid control period"),
            Error::InvalidGains => write!(f, "invalid pid gains"),
            Error::InvalidWeights => write!(f, "reference weights out of range"),
            Error::InvalidSaturation => write!(f, "invalid saturation bounds"),
            Error::FilterOrder => write!(f, "invalid filter order"),
            Error::FilterCoefficients => write!(f, "invalid filter coefficients"),
            Error::UnknownMode(code) => write!(f, "unknown mode code {}", code),
            Error::RecordOverflow => write!(f, "telemetry record overflow"),
        }
    }
}
