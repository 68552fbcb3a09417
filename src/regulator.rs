//! Attitude regulator
//!
//! Once per control period the regulator reads the pose estimate, turns
//! the orientation error into per-axis errors, picks the outputs for the
//! current mode, publishes a telemetry snapshot and drives the actuators.
//!
//! Configuration calls (`set_mode`, parameter setters, references) do no
//! locking of their own; the caller must not interleave them with a
//! running control cycle.

use cortex_m_log::printer::Printer;

use crate::actuators::{MotorDriver, ServoDriver};
use crate::attitude::{extract_error, AttitudeSource};
use crate::chrono::Clock;
use crate::controllers::{AxisController, PidParams};
use crate::dfilter::{FilterParams, RateFilter};
use crate::error::{Error, Result};
use crate::mode::RegulatorMode;
use crate::quat::{self, Quaternion};
use crate::telemetry::{TelemetryPublisher, TelemetrySnapshot};
use crate::types::{Axis, ControlOutput, RemoteOverride};

// 3rd order Butterworth low-pass at a quarter of the sample rate
const DEFAULT_YAW_RATE_B: [f32; 4] = [1.0 / 6.0, 0.5, 0.5, 1.0 / 6.0];
const DEFAULT_YAW_RATE_A: [f32; 4] = [1.0, 0.0, 1.0 / 3.0, 0.0];

pub struct Regulator<'p, A, M, S, C, L> {
    attitude: A,
    motors: M,
    servo: S,
    clock: C,
    log: L,
    telemetry: TelemetryPublisher<'p>,

    ready: bool,
    mode: RegulatorMode,
    axes: [AxisController; 3],
    rate_filters: [Option<RateFilter>; 3],
    reference: Quaternion,
    remote: RemoteOverride,
}

impl<'p, A, M, S, C, L> Regulator<'p, A, M, S, C, L>
    where A: AttitudeSource,
          M: MotorDriver,
          S: ServoDriver,
          C: Clock,
          L: Printer
{
    /// Un-initialized regulator; control cycles are no-ops until `setup`.
    pub fn new(attitude: A,
               motors: M,
               servo: S,
               clock: C,
               telemetry: TelemetryPublisher<'p>,
               log: L)
               -> Self {
        Regulator { attitude,
                    motors,
                    servo,
                    clock,
                    log,
                    telemetry,
                    ready: false,
                    mode: RegulatorMode::Off,
                    axes: [AxisController::new(0.0),
                           AxisController::new(0.0),
                           AxisController::new(0.0)],
                    rate_filters: [None, None, None],
                    reference: quat::IDENTITY,
                    remote: RemoteOverride::new() }
    }

    /// Brings up actuators and controllers for a control period of `ts`
    /// seconds. Leaves the regulator in `Off`, tracking identity.
    pub fn setup(&mut self, ts: f32) -> Result<()> {
        self.ready = false;
        if !ts.is_finite() || ts <= 0.0 {
            error!(self.log, "setup: bad period {}", ts);
            return Err(Error::InvalidPeriod);
        }
        self.mode = RegulatorMode::Off;

        self.servo.setup();
        self.motors.setup();

        self.axes = [AxisController::new(ts), AxisController::new(ts), AxisController::new(ts)];
        self.rate_filters = [None, None, None];
        self.reference = quat::IDENTITY;

        let yaw_rate = FilterParams::iir(&DEFAULT_YAW_RATE_B, &DEFAULT_YAW_RATE_A)?;
        self.rate_filters[Axis::Yaw.index()] = Some(RateFilter::new(&yaw_rate));

        self.ready = true;
        info!(self.log, "regulator ready, ts={}", ts);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mode(&self) -> RegulatorMode {
        self.mode
    }

    /// Switches output policy. Any mode may follow any other; re-entering
    /// the current mode re-applies its start/stop calls.
    pub fn set_mode(&mut self, mode: RegulatorMode) {
        self.mode = mode;
        for axis in self.axes.iter_mut() {
            if mode.axes_running() {
                axis.start();
            } else {
                axis.stop();
            }
        }
        if mode.servo_enabled() {
            self.servo.start();
        } else {
            self.servo.stop();
        }
        info!(self.log, "mode: {:?}", mode);
    }

    pub fn set_rate_filter(&mut self, axis: Axis, params: &FilterParams) {
        self.rate_filters[axis.index()] = Some(RateFilter::new(params));
    }

    pub fn clear_rate_filter(&mut self, axis: Axis) {
        self.rate_filters[axis.index()] = None;
    }

    pub fn rate_filter(&self, axis: Axis) -> Option<&RateFilter> {
        self.rate_filters[axis.index()].as_ref()
    }

    /// Applies gains, weights, offset and saturation together, or nothing.
    pub fn set_pid_params(&mut self, axis: Axis, params: &PidParams) -> Result<()> {
        let result = self.axes[axis.index()].set_params(params);
        if let Err(e) = result {
            error!(self.log, "{:?} pid rejected: {}", axis, e);
        }
        result
    }

    pub fn set_axis_reference(&mut self, axis: Axis, reference: f32) {
        self.axes[axis.index()].set_reference(reference);
    }

    pub fn axis(&self, axis: Axis) -> &AxisController {
        &self.axes[axis.index()]
    }

    pub fn orientation_reference(&self) -> Quaternion {
        self.reference
    }

    /// Stores the normalized `reference`. Zero-length or non-finite
    /// quaternions are ignored.
    pub fn set_orientation_reference(&mut self, reference: Quaternion) {
        if let Some(reference) = quat::normalized(&reference) {
            self.reference = reference;
        }
    }

    pub fn set_remote_override(&mut self, thrust: f32, steer: f32, elevator: f32) {
        self.remote = RemoteOverride { thrust, steer, elevator };
    }

    pub fn remote_override(&self) -> RemoteOverride {
        self.remote
    }

    pub fn attitude_mut(&mut self) -> &mut A {
        &mut self.attitude
    }

    pub fn motors(&self) -> &M {
        &self.motors
    }

    pub fn servo(&self) -> &S {
        &self.servo
    }

    /// Samples dropped because the telemetry reader fell behind.
    pub fn telemetry_reclaimed(&self) -> u32 {
        self.telemetry.reclaimed()
    }

    /// Periodic entry point. Never blocks.
    pub fn run_control_cycle(&mut self) {
        if !self.ready {
            return;
        }

        let pose = self.attitude.orientation();
        let mut error = extract_error(&self.reference, &pose);

        let output = match self.mode {
            RegulatorMode::RemoteControl => ControlOutput::from(self.remote),
            RegulatorMode::Track => {
                ControlOutput { steer: self.run_axis(Axis::Yaw, error.yaw),
                                elevator: self.run_axis(Axis::Pitch, error.pitch),
                                thrust: self.remote.thrust }
            }
            RegulatorMode::Off => ControlOutput::ZERO,
        };

        // The yaw rate filter conditions the pitch error here. Roll is
        // configured but not driven.
        if let Some(filter) = self.rate_filters[Axis::Yaw.index()].as_mut() {
            error.pitch = filter.apply(error.pitch);
        }
        debugfloats!(self.log, "err:", error.yaw, error.pitch, error.roll);

        let snapshot = TelemetrySnapshot { time: self.clock.now_ticks(),
                                           reference: self.reference,
                                           pose,
                                           error,
                                           output };
        let reclaimed = self.telemetry.reclaimed();
        if !self.telemetry.publish(snapshot) {
            debug!(self.log, "telemetry skipped");
        } else if self.telemetry.reclaimed() != reclaimed {
            debug!(self.log, "telemetry overwrote unread sample");
        }

        self.motors.set_steer(output.steer);
        self.motors.set_thrust(output.thrust);
        self.servo.set_position(output.elevator);
    }

    fn run_axis(&mut self, axis: Axis, signal: f32) -> f32 {
        let i = axis.index();
        let controller = &mut self.axes[i];
        if !controller.is_running() {
            return 0.0;
        }
        controller.run(signal, self.rate_filters[i].as_mut())
    }
}
