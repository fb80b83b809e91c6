//! Latchkey relay toggle firmware
//!
//! Exactly one `target-*` feature selects the board:
//!
//! - `target-dummy` - host executable driving the recording test board
//! - `target-attiny85` - AVR image (nightly, `avr-unknown-gnu-attiny85`)
//! - `target-pic12f675`, `target-pic10f320` - PIC images
//!
//! Tunables come from `latchkey.toml` via the build script.

#![cfg_attr(not(feature = "target-dummy"), no_std)]
#![cfg_attr(not(feature = "target-dummy"), no_main)]
#![cfg_attr(feature = "target-attiny85", feature(abi_avr_interrupt))]

#[cfg(not(any(
    feature = "target-dummy",
    feature = "target-attiny85",
    feature = "target-pic12f675",
    feature = "target-pic10f320"
)))]
compile_error!(
    "no target selected: enable exactly one of target-dummy, target-attiny85, \
     target-pic12f675, target-pic10f320"
);

#[cfg(any(
    all(feature = "target-dummy", feature = "target-attiny85"),
    all(feature = "target-dummy", feature = "target-pic12f675"),
    all(feature = "target-dummy", feature = "target-pic10f320"),
    all(feature = "target-attiny85", feature = "target-pic12f675"),
    all(feature = "target-attiny85", feature = "target-pic10f320"),
    all(feature = "target-pic12f675", feature = "target-pic10f320"),
))]
compile_error!("more than one target selected: enable exactly one target-* feature");

mod config {
    include!(concat!(env!("OUT_DIR"), "/tunables.rs"));
}

const _: () = assert!(config::TUNABLES.validate().is_ok());

#[cfg(feature = "target-dummy")]
#[path = "target/dummy.rs"]
mod target;

#[cfg(feature = "target-attiny85")]
#[path = "target/attiny85.rs"]
mod target;

#[cfg(any(feature = "target-pic12f675", feature = "target-pic10f320"))]
#[path = "target/pic.rs"]
mod target;

#[cfg(feature = "target-dummy")]
fn main() {
    std::process::exit(target::run());
}

#[cfg(feature = "target-attiny85")]
#[avr_device::entry]
fn main() -> ! {
    target::run()
}
