//! Status LED helpers

use latchkey_hal::{SleepDelay, StatusLed};

/// Blink the LED `blinks` times, `period_ms` on then `period_ms` off
///
/// Purely cosmetic: shows the device booted. Leaves the LED low.
pub fn greeting<B: StatusLed + SleepDelay>(board: &mut B, blinks: u8, period_ms: u16) {
    for _ in 0..blinks {
        board.led_set_high();
        board.sleep_millisecs(period_ms as u32);
        board.led_set_low();
        board.sleep_millisecs(period_ms as u32);
    }
}
