//! PIC mid-range HAL for the relay toggle firmware
//!
//! This crate implements the `latchkey-hal` contract for Microchip
//! mid-range PICs:
//!
//! - PIC12F675 (8-pin, 4MHz internal oscillator, banked SFRs)
//! - PIC10F320 (6-pin, 1MHz internal oscillator, latch registers)
//!
//! # Features
//!
//! - `pic12f675` - Enable the PIC12F675 board
//! - `pic10f320` - Enable the PIC10F320 board
//! - `defmt` - Enable debug formatting support
//!
//! # Register access
//!
//! Boards never touch memory directly. All special function register
//! accesses and the two CPU instructions the firmware needs (`SLEEP`, `NOP`)
//! go through an [`SfrBus`], so the exact register sequences can be checked
//! on the host with a fake register file. The firmware provides the device
//! bus.

#![no_std]
#![deny(unsafe_code)]

pub mod sfr;

#[cfg(any(test, feature = "pic12f675"))]
pub mod pic12f675;

#[cfg(any(test, feature = "pic10f320"))]
pub mod pic10f320;

pub use sfr::{bank_select, SfrBus};

#[cfg(any(test, feature = "pic12f675"))]
pub use pic12f675::Pic12f675;

#[cfg(any(test, feature = "pic10f320"))]
pub use pic10f320::Pic10f320;

/// Startup settle delay (ms)
///
/// Inherited calibration value with no documented origin. Re-derive it
/// empirically when porting to a new board revision.
pub const STARTUP_DELAY_MS: u32 = 72;

/// Instruction cycles per iteration of the busy-wait loop
///
/// One `NOP` plus the `DECFSZ`/`GOTO` loop overhead.
pub const CYCLES_PER_SPIN: u32 = 4;
