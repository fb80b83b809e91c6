//! Latching relay drive protocol
//!
//! A latching relay changes position on a short coil pulse and then holds it
//! with no power at all. Coil pin 1 pulses it ON (set), coil pin 2 pulses it
//! OFF (reset). There is no position feedback, so the software state is the
//! only record of where the contacts are.
//!
//! # Safety
//!
//! Every pulse must run with interrupts masked. A wake interrupt landing in
//! the middle of a pulse would otherwise let the device go back to sleep with
//! a coil still energized. The pulse is short and fixed, so it always runs to
//! completion rather than supporting cancellation.

use latchkey_hal::{RelayCoils, SleepDelay};

/// Logical position of the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayState {
    /// Reset position (coil pin 2 last pulsed)
    #[default]
    Off,
    /// Set position (coil pin 1 last pulsed)
    On,
}

impl RelayState {
    /// The opposite position
    pub fn toggled(self) -> Self {
        match self {
            RelayState::Off => RelayState::On,
            RelayState::On => RelayState::Off,
        }
    }

    /// Check if the relay is in the set position
    pub fn is_on(self) -> bool {
        self == RelayState::On
    }
}

/// Software-tracked latching relay
///
/// The only writer of [`RelayState`]. Nothing in interrupt context touches
/// it, so no locking is needed.
#[derive(Debug, Clone)]
pub struct LatchingRelay {
    state: RelayState,
    /// Coil pulse length (ms)
    settle_ms: u16,
}

impl LatchingRelay {
    /// Create a relay record in the OFF state
    ///
    /// The physical relay may be in either position at power-up; the boot
    /// sequence forces it OFF to match.
    pub fn new(settle_ms: u16) -> Self {
        Self {
            state: RelayState::Off,
            settle_ms,
        }
    }

    /// Last completed position
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Pulse coil pin 1, moving the relay ON ("set")
    ///
    /// Must be called with interrupts masked. Both coil pins are low on
    /// return regardless of the state they were found in.
    pub fn activate<B: RelayCoils + SleepDelay>(&mut self, board: &mut B) {
        // should already be low; clears leftovers from a partial operation
        board.coil2_set_low();
        board.coil1_set_high();
        board.sleep_millisecs(self.settle_ms as u32);
        board.coil1_set_low();
        self.state = RelayState::On;
    }

    /// Pulse coil pin 2, moving the relay OFF ("reset")
    ///
    /// Must be called with interrupts masked. Both coil pins are low on
    /// return regardless of the state they were found in.
    pub fn deactivate<B: RelayCoils + SleepDelay>(&mut self, board: &mut B) {
        board.coil1_set_low();
        board.coil2_set_high();
        board.sleep_millisecs(self.settle_ms as u32);
        board.coil2_set_low();
        self.state = RelayState::Off;
    }

    /// Flip the relay based on the recorded state
    ///
    /// Returns the new state.
    pub fn toggle<B: RelayCoils + SleepDelay>(&mut self, board: &mut B) -> RelayState {
        match self.state.toggled() {
            RelayState::On => self.activate(board),
            RelayState::Off => self.deactivate(board),
        }
        self.state
    }
}
