//! Sleep/wake state machine
//!
//! Defines which phase of the wake cycle the controller is in. The machine
//! is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::WakeEvent;
pub use machine::ControlState;
