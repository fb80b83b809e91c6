//! Shift-register switch debounce
//!
//! Each sample shifts the register left by one and ORs in the newest read
//! (1 = pressed), masked to the configured width. A press is accepted only
//! once every bit is set, i.e. `width` consecutive pressed reads. Contact
//! bounce and RF pickup break the run and start it over.
//!
//! The number of samples is capped, so a noisy or released switch costs at
//! most `max_reads × interval` before the wake is written off as a false
//! alarm.

use latchkey_hal::{SleepDelay, SwitchInput};

use crate::config::{DebounceWidth, SampleInterval, Tunables};

/// Outcome of one debounce run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceResult {
    /// A full run of pressed samples was seen
    Pressed,
    /// The sample budget ran out first; treated as "not pressed"
    TimedOut,
}

impl DebounceResult {
    /// Check if a press was confirmed
    pub fn is_pressed(self) -> bool {
        self == DebounceResult::Pressed
    }
}

/// Debounce parameters
///
/// Stateless between runs: the shift register is created fresh on every
/// call to [`Debouncer::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    width: DebounceWidth,
    max_reads: u16,
    interval: SampleInterval,
}

impl Debouncer {
    /// Create a debouncer
    pub fn new(width: DebounceWidth, max_reads: u16, interval: SampleInterval) -> Self {
        Self {
            width,
            max_reads,
            interval,
        }
    }

    /// Create a debouncer from the firmware tunables
    pub fn from_tunables(tunables: &Tunables) -> Self {
        Self::new(
            tunables.debounce_width,
            tunables.debounce_max_reads,
            tunables.debounce_interval,
        )
    }

    /// Sample the switch until a press is confirmed or the budget is spent
    ///
    /// Performs at most `max_reads` read+delay cycles. Must run with
    /// interrupts masked.
    pub fn run<B: SwitchInput + SleepDelay>(&self, board: &mut B) -> DebounceResult {
        let target = self.width.target();
        let mut register: u16 = 0;

        for _ in 0..self.max_reads {
            register = shift_in(register, board.switch_level().is_pressed(), target);
            self.pause(board);
            if register == target {
                return DebounceResult::Pressed;
            }
        }

        DebounceResult::TimedOut
    }

    fn pause<B: SleepDelay>(&self, board: &mut B) {
        match self.interval {
            SampleInterval::Millis(ms) => board.sleep_millisecs(ms as u32),
            SampleInterval::Micros(us) => board.sleep_microsecs(us as u32),
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::from_tunables(&Tunables::DEFAULT)
    }
}

/// Shift one sample into the register
fn shift_in(register: u16, pressed: bool, mask: u16) -> u16 {
    ((register << 1) | pressed as u16) & mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hal::{RelayBoard, SwitchLevel};
    use latchkey_hal_dummy::DummyBoard;

    fn ready_board() -> DummyBoard {
        let mut board = DummyBoard::new();
        board.hardware_init();
        board
    }

    fn debouncer_8x80() -> Debouncer {
        Debouncer::new(DebounceWidth::Eight, 80, SampleInterval::Millis(1))
    }

    #[test]
    fn test_shift_in() {
        assert_eq!(shift_in(0, true, 0xFF), 0b1);
        assert_eq!(shift_in(0b1, true, 0xFF), 0b11);
        assert_eq!(shift_in(0b1, false, 0xFF), 0b10);
        // bits beyond the width fall off
        assert_eq!(shift_in(0xFF, false, 0xFF), 0xFE);
        assert_eq!(shift_in(0xFFFF, true, 0xFFFF), 0xFFFF);
    }

    #[test]
    fn test_clean_press_confirms_after_width_reads() {
        let mut board = ready_board();
        board.queue_press(8);

        let result = debouncer_8x80().run(&mut board);

        assert_eq!(result, DebounceResult::Pressed);
        assert_eq!(board.stats().switch_reads, 8);
        assert_eq!(board.stats().delays, 8);
    }

    #[test]
    fn test_bounce_then_press() {
        let mut board = ready_board();
        board.queue_pattern([
            SwitchLevel::Low,
            SwitchLevel::High,
            SwitchLevel::Low,
            SwitchLevel::Low,
            SwitchLevel::High,
        ]);
        board.queue_press(8);

        let result = debouncer_8x80().run(&mut board);

        assert!(result.is_pressed());
        assert_eq!(board.stats().switch_reads, 13);
    }

    #[test]
    fn test_alternating_reads_time_out() {
        let mut board = ready_board();
        let pattern = (0..80).map(|i| {
            if i % 2 == 0 {
                SwitchLevel::Low
            } else {
                SwitchLevel::High
            }
        });
        board.queue_pattern(pattern);

        let result = debouncer_8x80().run(&mut board);

        assert_eq!(result, DebounceResult::TimedOut);
        assert_eq!(board.stats().switch_reads, 80);
        assert_eq!(board.stats().delays, 80);
    }

    #[test]
    fn test_released_switch_times_out() {
        let mut board = ready_board();

        let result = debouncer_8x80().run(&mut board);

        assert!(!result.is_pressed());
        assert_eq!(board.stats().switch_reads, 80);
    }

    #[test]
    fn test_seven_of_eight_is_not_enough() {
        let mut board = ready_board();
        board.queue_press(7);

        let result = Debouncer::new(DebounceWidth::Eight, 8, SampleInterval::Millis(1))
            .run(&mut board);

        assert_eq!(result, DebounceResult::TimedOut);
    }

    #[test]
    fn test_sixteen_bit_width() {
        let mut board = ready_board();
        board.queue_press(15);
        board.queue_reads(SwitchLevel::High, 1);
        board.queue_press(16);

        let result = Debouncer::new(DebounceWidth::Sixteen, 64, SampleInterval::Micros(50))
            .run(&mut board);

        assert!(result.is_pressed());
        assert_eq!(board.stats().switch_reads, 32);
        assert_eq!(board.stats().delay_ns, 32 * 50_000);
    }

    #[test]
    fn test_press_outside_budget_is_missed() {
        let mut board = ready_board();
        board.queue_reads(SwitchLevel::High, 10);
        board.queue_press(8);

        let result = Debouncer::new(DebounceWidth::Eight, 12, SampleInterval::Millis(1))
            .run(&mut board);

        assert_eq!(result, DebounceResult::TimedOut);
        assert_eq!(board.stats().switch_reads, 12);
    }

    #[test]
    fn test_default_uses_tunables() {
        assert_eq!(
            Debouncer::default(),
            Debouncer::new(DebounceWidth::Eight, 4095, SampleInterval::Millis(1))
        );
    }
}
