//! Attitude regulation for a small fixed-wing airframe: orientation error
//! extraction, per-axis PID control, mode handling and a non-blocking
//! telemetry relay between the control loop and a slower reader.
#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logging;

pub mod actuators;
pub mod ahrs;
pub mod attitude;
pub mod chrono;
pub mod controllers;
pub mod dfilter;
pub mod error;
pub mod mode;
pub mod pool;
pub mod prelude;
pub mod quat;
pub mod regulator;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use regulator::Regulator;
