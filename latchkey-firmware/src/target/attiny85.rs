//! ATtiny85 target
//!
//! Build with a nightly toolchain for `avr-unknown-gnu-attiny85`.

use avr_device::attiny85::Peripherals;
use latchkey_core::Controller;
use latchkey_hal_attiny85::{on_pin_change, Attiny85};

use crate::config::{CPU_HZ, TUNABLES};

pub fn run() -> ! {
    // SAFETY: first and only take of the peripherals. `take()` would pull a
    // possible panic into the image.
    let dp = unsafe { Peripherals::steal() };

    Controller::new(Attiny85::new(dp, CPU_HZ), TUNABLES).run()
}

#[avr_device::interrupt(attiny85)]
fn PCINT0() {
    // SAFETY: the ISR only touches GIMSK, which the main loop does not
    // modify while interrupts are enabled
    let dp = unsafe { Peripherals::steal() };
    on_pin_change(&dp.EXINT);
}

/// Link-time panic check
///
/// The image must not contain any reachable panic. If the optimizer cannot
/// prove a panic unreachable, linking fails with an undefined reference to
/// `a_panic_is_reachable` pointing at the offending line.
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    extern "C" {
        fn a_panic_is_reachable() -> !;
    }
    // SAFETY: if this were reachable, the image would not link
    unsafe { a_panic_is_reachable() }
}
