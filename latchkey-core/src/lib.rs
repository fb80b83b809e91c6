//! Board-agnostic control logic for the relay toggle firmware
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Latching relay drive protocol (pulse sequencing, software state)
//! - Shift-register switch debounce
//! - Sleep/wake state machine and the main control loop
//! - Status LED greeting blink
//! - Compile-time tunables and their validation

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod led;
pub mod relay;
pub mod state;

pub use config::{ConfigError, DebounceWidth, SampleInterval, Tunables};
pub use controller::{Controller, WakeOutcome};
pub use debounce::{DebounceResult, Debouncer};
pub use relay::{LatchingRelay, RelayState};
pub use state::{ControlState, WakeEvent};
