//! Control state definition
//!
//! `Sleeping` is the steady state. The awake states are transient and are
//! only ever entered after a wake interrupt.

use super::events::WakeEvent;

/// Controller phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlState {
    /// Power-on: hardware init, greeting, relay baseline
    #[default]
    Boot,
    /// Halted in the sleep instruction, waiting for a pin change
    Sleeping,
    /// Sampling the switch with interrupts masked
    AwakeDebouncing,
    /// Pulsing the relay and flipping the LED with interrupts masked
    AwakeActing,
}

impl ControlState {
    /// Check if the CPU is running after a wake
    pub fn is_awake(&self) -> bool {
        matches!(self, ControlState::AwakeDebouncing | ControlState::AwakeActing)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: WakeEvent) -> Self {
        use ControlState::*;
        use WakeEvent::*;

        match (self, event) {
            (Boot, BootComplete) => Sleeping,
            (Sleeping, Wake) => AwakeDebouncing,
            (AwakeDebouncing, PressConfirmed) => AwakeActing,
            (AwakeDebouncing, DebounceTimedOut) => Sleeping,
            (AwakeActing, ActionComplete) => Sleeping,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_to_sleeping() {
        let state = ControlState::Boot;
        assert_eq!(state.transition(WakeEvent::BootComplete), ControlState::Sleeping);
    }

    #[test]
    fn test_press_flow() {
        let sleeping = ControlState::Sleeping;

        let debouncing = sleeping.transition(WakeEvent::Wake);
        assert_eq!(debouncing, ControlState::AwakeDebouncing);

        let acting = debouncing.transition(WakeEvent::PressConfirmed);
        assert_eq!(acting, ControlState::AwakeActing);

        let back = acting.transition(WakeEvent::ActionComplete);
        assert_eq!(back, ControlState::Sleeping);
    }

    #[test]
    fn test_noise_flow() {
        let debouncing = ControlState::Sleeping.transition(WakeEvent::Wake);
        let back = debouncing.transition(WakeEvent::DebounceTimedOut);
        assert_eq!(back, ControlState::Sleeping);
    }

    #[test]
    fn test_unexpected_events_are_ignored() {
        assert_eq!(
            ControlState::Sleeping.transition(WakeEvent::PressConfirmed),
            ControlState::Sleeping
        );
        assert_eq!(
            ControlState::AwakeActing.transition(WakeEvent::Wake),
            ControlState::AwakeActing
        );
        assert_eq!(
            ControlState::Boot.transition(WakeEvent::Wake),
            ControlState::Boot
        );
    }

    #[test]
    fn test_is_awake() {
        assert!(ControlState::AwakeDebouncing.is_awake());
        assert!(ControlState::AwakeActing.is_awake());
        assert!(!ControlState::Sleeping.is_awake());
        assert!(!ControlState::Boot.is_awake());
    }
}
