//! Main control loop
//!
//! Owns the board, the relay record and the debounce parameters. The loop
//! is:
//!
//! ```text
//! boot ─► enable IRQs ─► sleep ─► (pin change ISR) ─► mask IRQs, clear sleep latch
//!                          ▲                                 │
//!                          │                              debounce
//!                          │                                 │
//!                   enable IRQs ◄── guard delay ◄── toggle ◄─┤ pressed
//!                          ▲                                 │
//!                          └─────────────────────────────────┘ timed out
//! ```
//!
//! The wake ISR does no work of its own; everything below runs in the main
//! thread with interrupts masked, so a second press cannot interleave with a
//! relay pulse in progress.

use latchkey_hal::{RelayBoard, SleepDelay};

use crate::config::Tunables;
use crate::debounce::{DebounceResult, Debouncer};
use crate::led;
use crate::relay::{LatchingRelay, RelayState};
use crate::state::{ControlState, WakeEvent};

/// What a wake cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeOutcome {
    /// Press confirmed; relay moved to the contained state
    Toggled(RelayState),
    /// Debounce timed out; nothing changed
    Ignored,
}

/// The relay toggle controller
pub struct Controller<B: RelayBoard> {
    board: B,
    relay: LatchingRelay,
    debouncer: Debouncer,
    tunables: Tunables,
    state: ControlState,
}

impl<B: RelayBoard> Controller<B> {
    /// Create a controller; nothing touches the hardware until [`boot`](Self::boot)
    pub fn new(board: B, tunables: Tunables) -> Self {
        Self {
            board,
            relay: LatchingRelay::new(tunables.relay_settle_ms),
            debouncer: Debouncer::from_tunables(&tunables),
            tunables,
            state: ControlState::Boot,
        }
    }

    /// Current controller phase
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Last completed relay position
    pub fn relay_state(&self) -> RelayState {
        self.relay.state()
    }

    /// Access the board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable access to the board
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Give the board back
    pub fn into_board(self) -> B {
        self.board
    }

    /// Power-on sequence
    ///
    /// Initializes the hardware, blinks the greeting, then forces relay and
    /// LED into the OFF baseline so the software state matches the contacts
    /// whatever position they were left in. Ends with interrupts enabled,
    /// ready for the first sleep.
    pub fn boot(&mut self) {
        self.board.hardware_init();

        #[cfg(feature = "defmt")]
        defmt::info!("latchkey booting on {}", B::TARGET);

        led::greeting(
            &mut self.board,
            self.tunables.greeting_blinks,
            self.tunables.greeting_period_ms,
        );

        self.board.coil2_set_low();
        self.board.coil1_set_low();
        self.relay.deactivate(&mut self.board);
        self.board.led_set_state(self.relay.state().is_on());

        // A press during boot must not cause an immediate spurious wake
        self.board.clear_switch_int_flags();

        self.advance(WakeEvent::BootComplete);
        self.board.enable_interrupts();
    }

    /// Halt until the pin-change interrupt fires
    pub fn sleep(&mut self) {
        self.board.enter_sleep_mode();
        self.advance(WakeEvent::Wake);
    }

    /// Handle one wake: debounce, maybe toggle, then re-enable interrupts
    pub fn service_wake(&mut self) -> WakeOutcome {
        debug_assert!(self.state.is_awake(), "service_wake without a wake");

        // The ISR masked interrupts already, but not necessarily every source
        self.board.disable_interrupts();
        self.board.disable_sleep();

        let result = self.debouncer.run(&mut self.board);
        self.board.clear_switch_int_flags();

        let outcome = match result {
            DebounceResult::Pressed => {
                self.advance(WakeEvent::PressConfirmed);

                let state = self.relay.toggle(&mut self.board);
                self.board.led_toggle();
                // hold off so release bounce cannot retrigger straight away
                self.board
                    .sleep_millisecs(self.tunables.switch_debounce_ms as u32);

                self.advance(WakeEvent::ActionComplete);
                WakeOutcome::Toggled(state)
            }
            DebounceResult::TimedOut => {
                self.advance(WakeEvent::DebounceTimedOut);
                WakeOutcome::Ignored
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("wake serviced: {}", outcome);

        self.board.enable_interrupts();
        outcome
    }

    /// Sleep, then service the wake that ended it
    pub fn step(&mut self) -> WakeOutcome {
        self.sleep();
        self.service_wake()
    }

    /// Boot and run forever
    ///
    /// Only an external reset or power loss ends this.
    pub fn run(mut self) -> ! {
        self.boot();
        loop {
            self.step();
        }
    }

    fn advance(&mut self, event: WakeEvent) {
        let next = self.state.transition(event);

        #[cfg(feature = "defmt")]
        if next != self.state {
            defmt::trace!("{} -> {}", self.state, next);
        }

        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hal::SwitchLevel;
    use latchkey_hal_dummy::{BoardEvent, DummyBoard};

    fn booted() -> Controller<DummyBoard> {
        let mut controller = Controller::new(DummyBoard::new(), Tunables::DEFAULT);
        controller.boot();
        controller
    }

    #[test]
    fn test_new_does_not_touch_hardware() {
        let controller = Controller::new(DummyBoard::new(), Tunables::DEFAULT);
        assert_eq!(controller.state(), ControlState::Boot);
        assert_eq!(controller.board().stats().inits, 0);
    }

    #[test]
    fn test_boot_baseline() {
        let controller = booted();
        let board = controller.board();

        assert_eq!(controller.state(), ControlState::Sleeping);
        assert_eq!(controller.relay_state(), RelayState::Off);
        assert!(!board.led_is_high());
        assert_eq!(board.coils(), (false, false));
        // baseline runs a full deactivate pulse
        assert_eq!(board.stats().coil2_pulses, 1);
        assert_eq!(board.stats().coil1_pulses, 0);
        assert_eq!(board.stats().flag_clears, 1);
        assert!(board.interrupts_enabled());
        assert!(board.violations().is_clean());
    }

    #[test]
    fn test_boot_greeting() {
        let controller = booted();
        // 4 blinks, each 250ms on + 250ms off, plus one 25ms baseline pulse
        assert_eq!(controller.board().stats().delay_ns, 2_025_000_000);
    }

    #[test]
    fn test_boot_without_greeting() {
        let tunables = Tunables {
            greeting_blinks: 0,
            ..Tunables::DEFAULT
        };
        let mut controller = Controller::new(DummyBoard::new(), tunables);
        controller.boot();
        assert_eq!(controller.board().stats().delay_ns, 25_000_000);
    }

    #[test]
    fn test_service_wake_toggles_on_press() {
        let mut controller = booted();
        controller.board_mut().queue_press(8);

        let outcome = controller.step();

        assert_eq!(outcome, WakeOutcome::Toggled(RelayState::On));
        assert_eq!(controller.relay_state(), RelayState::On);
        assert!(controller.board().led_is_high());
        assert_eq!(controller.state(), ControlState::Sleeping);
    }

    #[test]
    fn test_service_wake_clears_sleep_latch_and_flags() {
        let mut controller = booted();
        controller.sleep();
        assert!(controller.board().sleep_latched());
        assert_eq!(controller.state(), ControlState::AwakeDebouncing);

        controller.service_wake();

        assert!(!controller.board().sleep_latched());
        assert_eq!(controller.board().stats().flag_clears, 2);
    }

    #[test]
    fn test_action_sequence_order() {
        let mut controller = booted();
        controller.board_mut().queue_press(8);
        controller.sleep();
        controller.board_mut().clear_events();

        controller.service_wake();

        let events: heapless::Vec<BoardEvent, 64> = controller
            .board()
            .events()
            .copied()
            .filter(|e| !matches!(e, BoardEvent::Delay(1_000_000)))
            .collect();
        assert_eq!(
            events.as_slice(),
            &[
                BoardEvent::InterruptsDisabled,
                BoardEvent::SleepDisabled,
                BoardEvent::FlagsCleared,
                BoardEvent::Coil2(false),
                BoardEvent::Coil1(true),
                BoardEvent::Delay(25_000_000),
                BoardEvent::Coil1(false),
                BoardEvent::Led(true),
                BoardEvent::Delay(100_000_000),
                BoardEvent::InterruptsEnabled,
            ]
        );
    }

    #[test]
    fn test_released_wake_is_ignored() {
        let mut controller = booted();
        controller.board_mut().queue_reads(SwitchLevel::High, 16);

        assert_eq!(controller.step(), WakeOutcome::Ignored);
        assert_eq!(controller.relay_state(), RelayState::Off);
        assert_eq!(
            controller.board().stats().switch_reads,
            Tunables::DEFAULT.debounce_max_reads as u32
        );
    }

    #[test]
    fn test_into_board() {
        let controller = booted();
        let board = controller.into_board();
        assert_eq!(board.stats().inits, 1);
    }
}
