//! Latchkey Hardware Abstraction Layer
//!
//! This crate defines the fixed operation set every target microcontroller
//! must provide. The control logic in `latchkey-core` is written purely
//! against these traits, so the same relay/debounce/sleep loop runs on every
//! supported chip.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  latchkey-firmware (one target linked)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  latchkey-core (control logic)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  latchkey-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!      ┌──────────────┼──────────────┐
//!      ▼              ▼              ▼
//! ┌──────────┐  ┌───────────┐  ┌───────────┐
//! │  dummy   │  │ attiny85  │  │    pic    │
//! └──────────┘  └───────────┘  └───────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::StatusLed`], [`gpio::RelayCoils`], [`gpio::SwitchInput`] - pins
//! - [`power::PowerControl`] - interrupt mask and sleep control
//! - [`delay::SleepDelay`] - busy-wait delays on top of `embedded-hal`
//! - [`board::RelayBoard`] - everything above plus `hardware_init()`

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod delay;
pub mod gpio;
pub mod power;

// Re-export key traits at crate root for convenience
pub use board::{RelayBoard, Target};
pub use delay::SleepDelay;
pub use embedded_hal::delay::DelayNs;
pub use gpio::{RelayCoils, StatusLed, SwitchInput, SwitchLevel};
pub use power::PowerControl;
