//! ATtiny85 HAL for the relay toggle firmware
//!
//! This crate implements the `latchkey-hal` board contract on top of the
//! `avr-device` peripheral access crate:
//!
//! - Pin roles on PORTB (see [`pins`])
//! - Power-down sleep with a PCINT0 wake
//! - Busy-wait delays calibrated against the CPU clock
//!
//! The crate only builds for AVR (`avr-device` register blocks and the
//! `sei; sleep` sequence are device-only), so it is not a default workspace
//! member.

#![no_std]
#![deny(unsafe_code)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod board;
pub mod pins;

pub use board::{on_pin_change, Attiny85};

/// Startup settle delay (ms), applied before and after peripheral setup
pub const STARTUP_DELAY_MS: u32 = 5;

/// CPU cycles per iteration of the busy-wait loop
///
/// One `NOP` plus a 32-bit decrement, compare and branch.
pub const CYCLES_PER_SPIN: u32 = 8;
