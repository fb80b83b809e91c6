//! Host target
//!
//! Boots the control loop on the recording board, services one scripted
//! press and one burst of noise, and reports what the board saw. Exits
//! non-zero if the run broke any hardware rule.

use latchkey_core::{Controller, RelayState, WakeOutcome};
use latchkey_hal::{RelayBoard, SwitchLevel};
use latchkey_hal_dummy::DummyBoard;

use crate::config::TUNABLES;

pub fn run() -> i32 {
    let mut board = DummyBoard::new();
    let width = TUNABLES.debounce_width.bits() as usize;
    board.queue_press(width);
    board.queue_pattern(
        [SwitchLevel::Low, SwitchLevel::High]
            .into_iter()
            .cycle()
            .take(TUNABLES.debounce_max_reads as usize),
    );

    let mut controller = Controller::new(board, TUNABLES);
    controller.boot();

    let press = controller.step();
    let noise = controller.step();

    let board = controller.board();
    let stats = board.stats();
    println!("target: {}", DummyBoard::TARGET.name());
    println!("press: {:?}", press);
    println!("noise: {:?}", noise);
    println!(
        "sleeps={} reads={} delays={} ({}ns) coil1={} coil2={}",
        stats.sleeps,
        stats.switch_reads,
        stats.delays,
        stats.delay_ns,
        stats.coil1_pulses,
        stats.coil2_pulses
    );

    let expected = press == WakeOutcome::Toggled(RelayState::On)
        && noise == WakeOutcome::Ignored
        && board.led_is_high();

    if !board.violations().is_clean() {
        eprintln!("hardware rule violated: {:?}", board.violations());
        return 2;
    }
    if !expected {
        eprintln!("unexpected outcome");
        return 1;
    }
    0
}
