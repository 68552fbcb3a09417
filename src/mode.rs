use core::convert::TryFrom;

use crate::error::Error;

/// Output-generation policy of the regulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulatorMode {
    /// Everything commanded to zero, elevator servo disabled
    Off,
    /// Yaw/pitch closed loop, thrust from the remote override
    Track,
    /// Remote override passed straight through
    RemoteControl,
}

impl RegulatorMode {
    /// Whether the axis controllers run in this mode.
    #[inline]
    pub const fn axes_running(self) -> bool {
        matches!(self, RegulatorMode::Track)
    }

    /// Whether the elevator servo is enabled in this mode.
    #[inline]
    pub const fn servo_enabled(self) -> bool {
        !matches!(self, RegulatorMode::Off)
    }

    pub const fn code(self) -> u8 {
        match self {
            RegulatorMode::Off => 0,
            RegulatorMode::Track => 1,
            RegulatorMode::RemoteControl => 2,
        }
    }
}

impl Default for RegulatorMode {
    fn default() -> Self {
        RegulatorMode::Off
    }
}

impl TryFrom<u8> for RegulatorMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        match code {
            0 => Ok(RegulatorMode::Off),
            1 => Ok(RegulatorMode::Track),
            2 => Ok(RegulatorMode::RemoteControl),
            other => Err(Error::UnknownMode(other)),
        }
    }
}
