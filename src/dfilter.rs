//! Direct-form-I digital filters used on the derivative (rate) paths.

use crate::error::{Error, Result};

pub const MAX_FILTER_ORDER: usize = 6;
const TAPS: usize = MAX_FILTER_ORDER + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Recursive; uses both coefficient sets
    Iir,
    /// Feedforward only; feedback coefficients are ignored
    Fir,
}

/// Validated filter description. Order is `feedforward.len() - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    order: usize,
    kind: FilterKind,
    b: [f32; TAPS],
    a: [f32; TAPS],
}

impl FilterParams {
    pub fn new(kind: FilterKind, feedforward: &[f32], feedback: &[f32]) -> Result<Self> {
        if feedforward.len() < 2 || feedforward.len() > TAPS {
            return Err(Error::FilterOrder);
        }
        let order = feedforward.len() - 1;
        let mut b = [0.0; TAPS];
        let mut a = [0.0; TAPS];
        b[..=order].copy_from_slice(feedforward);
        a[0] = 1.0;

        if kind == FilterKind::Iir {
            if feedback.len() != feedforward.len() {
                return Err(Error::FilterOrder);
            }
            if feedback[0] == 0.0 {
                return Err(Error::FilterCoefficients);
            }
            a[..=order].copy_from_slice(feedback);
        }
        if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
            return Err(Error::FilterCoefficients);
        }

        let a0 = a[0];
        for c in b.iter_mut().chain(a.iter_mut()) {
            *c /= a0;
        }
        Ok(FilterParams { order, kind, b, a })
    }

    pub fn iir(feedforward: &[f32], feedback: &[f32]) -> Result<Self> {
        FilterParams::new(FilterKind::Iir, feedforward, feedback)
    }

    pub fn fir(feedforward: &[f32]) -> Result<Self> {
        FilterParams::new(FilterKind::Fir, feedforward, &[])
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
pub struct RateFilter {
    params: FilterParams,
    // inputs[k] = x[n-k], outputs[k] = y[n-1-k]
    inputs: [f32; TAPS],
    outputs: [f32; TAPS],
}

impl RateFilter {
    pub fn new(params: &FilterParams) -> Self {
        RateFilter { params: *params,
                     inputs: [0.0; TAPS],
                     outputs: [0.0; TAPS] }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn reset(&mut self) {
        self.inputs = [0.0; TAPS];
        self.outputs = [0.0; TAPS];
    }

    pub fn apply(&mut self, sample: f32) -> f32 {
        let n = self.params.order;
        self.inputs.copy_within(0..n, 1);
        self.inputs[0] = sample;

        let mut acc = 0.0;
        for k in 0..=n {
            acc += self.params.b[k] * self.inputs[k];
        }
        if self.params.kind == FilterKind::Iir {
            for k in 1..=n {
                acc -= self.params.a[k] * self.outputs[k - 1];
            }
        }

        self.outputs.copy_within(0..n - 1, 1);
        self.outputs[0] = acc;
        acc
    }
}
