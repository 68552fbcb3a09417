use crate::dfilter::RateFilter;
use crate::error::{Error, Result};

/// Output bounds of an axis controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation {
    pub max: f32,
    pub min: f32,
}

impl Saturation {
    pub const UNIT: Saturation = Saturation { max: 1.0, min: -1.0 };
}

/// Gains, reference weights, offset and saturation of one axis, applied
/// as a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidParams {
    pub reference: f32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Share of the reference seen by the proportional term
    pub beta: f32,
    /// Share of the reference seen by the derivative term
    pub gamma: f32,
    pub offset: f32,
    pub saturation: Saturation,
}

impl PidParams {
    pub const fn new() -> Self {
        PidParams { reference: 0.0,
                    kp: 0.0,
                    ki: 0.0,
                    kd: 0.0,
                    beta: 1.0,
                    gamma: 0.0,
                    offset: 0.0,
                    saturation: Saturation::UNIT }
    }

    pub fn validate(&self) -> Result<()> {
        let numbers = [self.reference, self.kp, self.ki, self.kd, self.offset];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidGains);
        }
        if !(0.0..=1.0).contains(&self.beta) || !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::InvalidWeights);
        }
        let Saturation { max, min } = self.saturation;
        if !max.is_finite() || !min.is_finite() || max <= min {
            return Err(Error::InvalidSaturation);
        }
        Ok(())
    }
}

impl Default for PidParams {
    fn default() -> Self {
        PidParams::new()
    }
}

/// Two-degree-of-freedom PID for a single body axis.
///
/// u = offset + kp (beta r - y) + I + kd d/dt (gamma r - y), clamped to
/// the saturation bounds. The integrator holds while the output is
/// pinned against a bound in the direction of the error.
#[derive(Debug, Clone)]
pub struct AxisController {
    params: PidParams,
    ts: f32,
    running: bool,
    integral: f32,
    last_derivative_input: Option<f32>,
}

impl AxisController {
    pub fn new(ts: f32) -> Self {
        AxisController { params: PidParams::new(),
                         ts,
                         running: false,
                         integral: 0.0,
                         last_derivative_input: None }
    }

    pub fn params(&self) -> &PidParams {
        &self.params
    }

    pub fn set_params(&mut self, params: &PidParams) -> Result<()> {
        params.validate()?;
        self.params = *params;
        Ok(())
    }

    pub fn set_reference(&mut self, reference: f32) {
        if reference.is_finite() {
            self.params.reference = reference;
        }
    }

    pub fn start(&mut self) {
        self.integral = 0.0;
        self.last_derivative_input = None;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// One controller step on the feedback `signal`. Returns 0 when
    /// stopped.
    pub fn run(&mut self, signal: f32, rate_filter: Option<&mut RateFilter>) -> f32 {
        if !self.running {
            return 0.0;
        }
        let p = &self.params;
        let r = p.reference;
        let error = r - signal;

        let proportional = p.kp * (p.beta * r - signal);

        let mut derivative_input = p.gamma * r - signal;
        if let Some(filter) = rate_filter {
            derivative_input = filter.apply(derivative_input);
        }
        let derivative = match self.last_derivative_input {
            Some(last) => p.kd * (derivative_input - last) / self.ts,
            None => 0.0,
        };
        self.last_derivative_input = Some(derivative_input);

        let integral = self.integral + p.ki * self.ts * error;
        let unclamped = p.offset + proportional + integral + derivative;
        let Saturation { max, min } = p.saturation;
        let output = unclamped.clamp(min, max);

        let winding_up = (unclamped > max && error > 0.0) || (unclamped < min && error < 0.0);
        if !winding_up {
            self.integral = integral;
        }
        output
    }
}
