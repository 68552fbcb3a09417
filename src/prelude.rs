pub use crate::actuators::{MotorDriver, PwmMotors, PwmServo, ServoDriver};
pub use crate::ahrs::{AhrsResult, DcmAttitude};
pub use crate::attitude::{extract_error, AttitudeError, AttitudeSource};
#[cfg(target_arch = "arm")]
pub use crate::chrono::DwtClock;
pub use crate::chrono::Clock;
pub use crate::controllers::{AxisController, PidParams, Saturation};
pub use crate::dfilter::{FilterKind, FilterParams, RateFilter};
pub use crate::error::{Error, Result};
pub use crate::mode::RegulatorMode;
pub use crate::pool::{Occupancy, SlotHandle, SlotPool, Taken};
pub use crate::quat::Quaternion;
pub use crate::regulator::Regulator;
pub use crate::telemetry::{RecordBuffer, TelemetryPool, TelemetryPublisher, TelemetryReader,
                           TelemetrySnapshot};
pub use crate::types::{Axis, ControlOutput, RemoteOverride};
