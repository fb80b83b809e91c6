//! Busy-wait delay primitives
//!
//! Delays block the only thread of execution and burn power; they are used
//! for short bounded waits only (relay pulse, debounce sampling, LED blink).
//! Accuracy depends entirely on the instruction clock the target was
//! calibrated for.

use embedded_hal::delay::DelayNs;

/// Millisecond/microsecond delay names used by the control logic
///
/// Blanket-implemented for every [`DelayNs`], so targets only implement
/// `delay_ns`.
pub trait SleepDelay: DelayNs {
    /// Busy-wait for `ms` milliseconds
    fn sleep_millisecs(&mut self, ms: u32) {
        self.delay_ms(ms);
    }

    /// Busy-wait for `us` microseconds
    fn sleep_microsecs(&mut self, us: u32) {
        self.delay_us(us);
    }
}

impl<T: DelayNs + ?Sized> SleepDelay for T {}

/// Number of spin-loop iterations covering `ns` nanoseconds
///
/// # Arguments
/// - `ns`: requested delay
/// - `instr_hz`: instruction rate (AVR: CPU clock, PIC mid-range: Fosc/4)
/// - `cycles_per_spin`: instruction cycles consumed by one loop iteration
///
/// Rounds up, so a non-zero request never produces a zero-length wait.
pub fn spin_count(ns: u32, instr_hz: u32, cycles_per_spin: u32) -> u32 {
    if ns == 0 || instr_hz == 0 {
        return 0;
    }
    let cycles = (ns as u64 * instr_hz as u64).div_ceil(1_000_000_000);
    let spins = cycles.div_ceil(cycles_per_spin.max(1) as u64);
    spins.min(u32::MAX as u64) as u32
}
