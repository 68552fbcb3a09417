use crate::attitude::AttitudeError;
use crate::error::Result;
use crate::pool::{Publisher, Reader, SlotPool};
use crate::quat::{self, Quaternion};
use crate::types::ControlOutput;
use crate::utils::{fill_with_float, fill_with_str, fill_with_ticks};

pub const POOL_CAPACITY: usize = 5;
pub const RECORD_CAPACITY: usize = 320;

pub type TelemetryPool = SlotPool<TelemetrySnapshot, POOL_CAPACITY>;
pub type TelemetryPublisher<'a> = Publisher<'a, TelemetrySnapshot, POOL_CAPACITY>;
pub type TelemetryReader<'a> = Reader<'a, TelemetrySnapshot, POOL_CAPACITY>;
pub type RecordBuffer = heapless::String<RECORD_CAPACITY>;

/// Regulator state captured once per control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySnapshot {
    pub time: u32,
    pub reference: Quaternion,
    pub pose: Quaternion,
    pub error: AttitudeError,
    pub output: ControlOutput,
}

impl TelemetrySnapshot {
    /// All-zero snapshot; what a reader gets when nothing is pending.
    pub const EMPTY: TelemetrySnapshot = TelemetrySnapshot { time: 0,
                                                             reference: quat::ZERO,
                                                             pose: quat::ZERO,
                                                             error: AttitudeError::ZERO,
                                                             output: ControlOutput::ZERO };

    pub fn is_empty(&self) -> bool {
        *self == TelemetrySnapshot::EMPTY
    }

    /// Renders one line:
    /// `rg:time;ref w;x;y;z;pose w;x;y;z;angle;roll;pitch;yaw;thrust;steer;elevator;\n`
    pub fn write_record(&self, buffer: &mut RecordBuffer) -> Result<()> {
        fill_with_str(buffer, "rg:")?;
        fill_with_ticks(buffer, self.time)?;
        let e = &self.error;
        let u = &self.output;
        let fields = [self.reference.w,
                      self.reference.i,
                      self.reference.j,
                      self.reference.k,
                      self.pose.w,
                      self.pose.i,
                      self.pose.j,
                      self.pose.k,
                      e.angle,
                      e.roll,
                      e.pitch,
                      e.yaw,
                      u.thrust,
                      u.steer,
                      u.elevator];
        for f in fields.iter() {
            fill_with_float(buffer, *f)?;
        }
        fill_with_str(buffer, "\n")
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        TelemetrySnapshot::EMPTY
    }
}

/// Pool sized for regulator telemetry, every slot empty.
pub fn pool() -> TelemetryPool {
    TelemetryPool::new(TelemetrySnapshot::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_record() {
        let mut buffer = RecordBuffer::new();
        TelemetrySnapshot::EMPTY.write_record(&mut buffer).unwrap();
        assert!(buffer.starts_with("rg:0;0.0;"));
        assert!(buffer.ends_with(";\n"));
        assert_eq!(buffer.matches(';').count(), 16);
    }

    #[test]
    fn record_carries_outputs_last() {
        let snapshot = TelemetrySnapshot { time: 42,
                                           reference: quat::IDENTITY,
                                           output: ControlOutput { thrust: 0.5,
                                                                   steer: -0.25,
                                                                   elevator: 1.0 },
                                           ..TelemetrySnapshot::EMPTY };
        let mut buffer = RecordBuffer::new();
        snapshot.write_record(&mut buffer).unwrap();
        assert!(buffer.starts_with("rg:42;1.0;0.0;"));
        assert!(buffer.ends_with("0.5;-0.25;1.0;\n"));
    }

    #[test]
    fn record_reports_overflow() {
        let mut buffer = RecordBuffer::new();
        for _ in 0..RECORD_CAPACITY - 4 {
            buffer.push('x').unwrap();
        }
        assert_eq!(TelemetrySnapshot::EMPTY.write_record(&mut buffer),
                   Err(Error::RecordOverflow));
    }

    #[test]
    fn reader_hands_back_zero_snapshot_when_idle() {
        let mut pool = pool();
        let (_tx, mut rx) = pool.split();
        let snapshot = rx.next_value();
        assert!(snapshot.is_empty());
    }
}
