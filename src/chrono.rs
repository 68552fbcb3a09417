/// Monotonic time source used to stamp telemetry.
pub trait Clock {
    /// Free-running tick counter; wraps.
    fn now_ticks(&self) -> u32;
}

/// Cycle counter of the Cortex-M data watchpoint unit.
#[cfg(target_arch = "arm")]
pub struct DwtClock;

#[cfg(target_arch = "arm")]
impl DwtClock {
    pub fn new(dcb: &mut cortex_m::peripheral::DCB,
               dwt: &mut cortex_m::peripheral::DWT)
               -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        DwtClock
    }
}

#[cfg(target_arch = "arm")]
impl Clock for DwtClock {
    fn now_ticks(&self) -> u32 {
        cortex_m::peripheral::DWT::cycle_count()
    }
}
