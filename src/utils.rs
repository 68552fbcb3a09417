use core::fmt::Write;

use crate::error::{Error, Result};
use crate::telemetry::RecordBuffer;

pub fn fill_with_str(buffer: &mut RecordBuffer, arg: &str) -> Result<()> {
    buffer.push_str(arg).map_err(|_| Error::RecordOverflow)
}

pub fn fill_with_float(buffer: &mut RecordBuffer, f: f32) -> Result<()> {
    let mut b = ryu::Buffer::new();
    fill_with_str(buffer, b.format(f))?;
    fill_with_str(buffer, ";")
}

pub fn fill_with_ticks(buffer: &mut RecordBuffer, ticks: u32) -> Result<()> {
    write!(buffer, "{};", ticks).map_err(|_| Error::RecordOverflow)
}
