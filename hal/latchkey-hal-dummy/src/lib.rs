//! Dummy board for host-side builds and tests
//!
//! [`DummyBoard`] implements the whole `latchkey-hal` contract without any
//! hardware. Pin levels and power state are recorded, switch reads are
//! served from a script, and delays only accumulate time. Anything that would
//! be a hardware fault on a real target (both coils energized, sleeping with
//! interrupts masked, a coil pulse that an interrupt could preempt) is latched
//! in [`Violations`] for tests to assert on.
//!
//! The switch interrupt is modelled the way the device targets behave: a
//! latched switch flag stays pending until cleared, and whenever interrupts
//! are enabled while the wake source is armed and the flag is pending, the
//! ISR runs at once and disarms the wake source. `enter_sleep_mode` re-arms
//! the source under the global mask, so a pending flag ends the sleep instead
//! of being consumed just before it.
//!
//! This target is for host builds only and must never be chosen for a device
//! image.

#![no_std]
#![deny(unsafe_code)]

use heapless::{Deque, HistoryBuffer};
use latchkey_hal::{
    DelayNs, PowerControl, RelayBoard, RelayCoils, StatusLed, SwitchInput, SwitchLevel, Target,
};

/// Maximum number of scripted switch reads
pub const SCRIPT_CAPACITY: usize = 1024;

/// Number of most recent events kept in the log
pub const EVENT_LOG_CAPACITY: usize = 128;

/// Something the control logic did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardEvent {
    HardwareInit,
    InterruptsDisabled,
    InterruptsEnabled,
    SleepDisabled,
    /// Entered sleep and was woken by the (simulated) pin-change ISR
    Slept,
    Led(bool),
    Coil1(bool),
    Coil2(bool),
    FlagsCleared,
    /// Busy-wait of the given length in nanoseconds
    Delay(u64),
    /// The ISR ran outside of sleep because a switch flag was pending
    Interrupted,
}

/// Hardware faults the dummy detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Violations {
    /// Both coil pins were high at the same time
    pub coils_overlapped: bool,
    /// A coil pin went high while interrupts were enabled
    pub coil_pulse_interruptible: bool,
    /// The switch was sampled while interrupts were enabled
    pub read_interruptible: bool,
    /// Sleep was entered with interrupts masked (device would hang)
    pub slept_masked: bool,
    /// The sleep instruction ran with the wake source disarmed (device would hang)
    pub slept_disarmed: bool,
    /// An operation ran before `hardware_init()`
    pub used_before_init: bool,
}

impl Violations {
    /// Check if no fault was recorded
    pub fn is_clean(&self) -> bool {
        *self == Violations::default()
    }
}

/// Counters of board activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub inits: u32,
    pub sleeps: u32,
    pub switch_reads: u32,
    pub delays: u32,
    pub delay_ns: u64,
    pub led_toggles: u32,
    pub flag_clears: u32,
    pub coil1_pulses: u32,
    pub coil2_pulses: u32,
    pub early_interrupts: u32,
}

/// Recording, scriptable implementation of [`RelayBoard`]
pub struct DummyBoard {
    led: bool,
    coil1: bool,
    coil2: bool,
    interrupts_enabled: bool,
    sleep_latch: bool,
    initialized: bool,
    switch_flag: bool,
    wake_armed: bool,
    masked_rearm: bool,
    flag_on_delays: u32,
    idle_level: SwitchLevel,
    script: Deque<SwitchLevel, SCRIPT_CAPACITY>,
    stats: Stats,
    violations: Violations,
    events: HistoryBuffer<BoardEvent, EVENT_LOG_CAPACITY>,
}

impl Default for DummyBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyBoard {
    /// Create a board whose switch reads released once the script runs dry
    pub fn new() -> Self {
        Self::with_idle_level(SwitchLevel::High)
    }

    /// Create a board with a specific level for unscripted reads
    pub fn with_idle_level(idle_level: SwitchLevel) -> Self {
        Self {
            // Power-on state: pins undefined, interrupts off
            led: false,
            coil1: false,
            coil2: false,
            interrupts_enabled: false,
            sleep_latch: false,
            initialized: false,
            switch_flag: false,
            wake_armed: false,
            masked_rearm: true,
            flag_on_delays: 0,
            idle_level,
            script: Deque::new(),
            stats: Stats::default(),
            violations: Violations::default(),
            events: HistoryBuffer::new(),
        }
    }

    /// Re-arm the wake source with interrupts left as the caller had them
    ///
    /// Models a target whose sleep entry lets a pending flag vector before
    /// the sleep instruction. Such a board records
    /// [`Violations::slept_disarmed`].
    pub fn unmasked_rearm(mut self) -> Self {
        self.masked_rearm = false;
        self
    }

    /// Latch the switch interrupt flag, as a pin change would
    pub fn latch_switch_flag(&mut self) {
        self.switch_flag = true;
        self.service_pending();
    }

    /// Latch the switch flag during each of the next `count` delays
    ///
    /// Simulates contact bounce arriving while the control loop busy-waits.
    pub fn latch_flag_during_delays(&mut self, count: u32) {
        self.flag_on_delays = count;
    }

    /// Check if a switch flag is latched
    pub fn switch_flag_pending(&self) -> bool {
        self.switch_flag
    }

    /// Check if the pin-change wake source is armed
    pub fn wake_armed(&self) -> bool {
        self.wake_armed
    }

    /// Queue `count` reads of `level`
    ///
    /// Returns how many reads were queued (fewer if the script is full).
    pub fn queue_reads(&mut self, level: SwitchLevel, count: usize) -> usize {
        let mut queued = 0;
        for _ in 0..count {
            if self.script.push_back(level).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Queue a held press lasting `reads` samples
    pub fn queue_press(&mut self, reads: usize) -> usize {
        self.queue_reads(SwitchLevel::Low, reads)
    }

    /// Queue an arbitrary sequence of reads
    pub fn queue_pattern<I: IntoIterator<Item = SwitchLevel>>(&mut self, pattern: I) -> usize {
        let mut queued = 0;
        for level in pattern {
            if self.script.push_back(level).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Drop any scripted reads not consumed yet
    pub fn clear_script(&mut self) {
        self.script.clear();
    }

    /// Number of scripted reads not consumed yet
    pub fn script_remaining(&self) -> usize {
        self.script.len()
    }

    /// Current LED pin level
    pub fn led_is_high(&self) -> bool {
        self.led
    }

    /// Current coil pin levels `(pin1, pin2)`
    pub fn coils(&self) -> (bool, bool) {
        (self.coil1, self.coil2)
    }

    /// Check if interrupts are currently unmasked
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Check if the sleep-enable latch is set
    pub fn sleep_latched(&self) -> bool {
        self.sleep_latch
    }

    /// Activity counters
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Faults recorded so far
    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    /// The most recent events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &BoardEvent> {
        self.events.oldest_ordered()
    }

    /// Forget logged events (counters and violations are kept)
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: BoardEvent) {
        if !self.initialized && event != BoardEvent::HardwareInit {
            self.violations.used_before_init = true;
        }
        self.events.write(event);
    }

    fn check_coils(&mut self) {
        if self.coil1 && self.coil2 {
            self.violations.coils_overlapped = true;
        }
        if (self.coil1 || self.coil2) && self.interrupts_enabled {
            self.violations.coil_pulse_interruptible = true;
        }
    }

    fn add_delay(&mut self, ns: u64) {
        self.stats.delays += 1;
        self.stats.delay_ns += ns;
        self.record(BoardEvent::Delay(ns));
        if self.flag_on_delays > 0 {
            self.flag_on_delays -= 1;
            self.latch_switch_flag();
        }
    }

    /// Run the ISR if it would vector right now
    fn service_pending(&mut self) {
        if self.interrupts_enabled && self.wake_armed && self.switch_flag {
            // ISR masks its own source; `reti` restores the global enable
            self.wake_armed = false;
            self.stats.early_interrupts += 1;
            self.record(BoardEvent::Interrupted);
        }
    }
}

impl PowerControl for DummyBoard {
    fn disable_interrupts(&mut self) {
        self.interrupts_enabled = false;
        self.record(BoardEvent::InterruptsDisabled);
    }

    fn enable_interrupts(&mut self) {
        self.interrupts_enabled = true;
        self.record(BoardEvent::InterruptsEnabled);
        self.service_pending();
    }

    fn disable_sleep(&mut self) {
        self.sleep_latch = false;
        self.record(BoardEvent::SleepDisabled);
    }

    fn enter_sleep_mode(&mut self) {
        if !self.interrupts_enabled {
            // No interrupt can fire; real silicon would never wake up
            self.violations.slept_masked = true;
        }

        let enabled = self.interrupts_enabled;
        if self.masked_rearm {
            self.interrupts_enabled = false;
        }
        self.wake_armed = true;
        self.sleep_latch = true;
        self.service_pending();
        // enable-and-sleep is atomic: the sleep instruction runs first
        self.interrupts_enabled = enabled;

        if !self.wake_armed {
            self.violations.slept_disarmed = true;
        }
        self.stats.sleeps += 1;
        self.record(BoardEvent::Slept);

        // Woken by a pending or fresh pin change: the ISR disarms the source
        // and the control loop finds interrupts masked
        self.switch_flag = true;
        self.wake_armed = false;
        self.interrupts_enabled = false;
    }
}

impl StatusLed for DummyBoard {
    fn led_set_high(&mut self) {
        self.led = true;
        self.record(BoardEvent::Led(true));
    }

    fn led_set_low(&mut self) {
        self.led = false;
        self.record(BoardEvent::Led(false));
    }

    fn led_toggle(&mut self) {
        self.led = !self.led;
        self.stats.led_toggles += 1;
        self.record(BoardEvent::Led(self.led));
    }
}

impl RelayCoils for DummyBoard {
    fn coil1_set_high(&mut self) {
        if !self.coil1 {
            self.stats.coil1_pulses += 1;
        }
        self.coil1 = true;
        self.check_coils();
        self.record(BoardEvent::Coil1(true));
    }

    fn coil1_set_low(&mut self) {
        self.coil1 = false;
        self.record(BoardEvent::Coil1(false));
    }

    fn coil2_set_high(&mut self) {
        if !self.coil2 {
            self.stats.coil2_pulses += 1;
        }
        self.coil2 = true;
        self.check_coils();
        self.record(BoardEvent::Coil2(true));
    }

    fn coil2_set_low(&mut self) {
        self.coil2 = false;
        self.record(BoardEvent::Coil2(false));
    }
}

impl SwitchInput for DummyBoard {
    fn switch_level(&mut self) -> SwitchLevel {
        if self.interrupts_enabled {
            self.violations.read_interruptible = true;
        }
        self.stats.switch_reads += 1;
        self.script.pop_front().unwrap_or(self.idle_level)
    }

    fn clear_switch_int_flags(&mut self) {
        self.switch_flag = false;
        self.stats.flag_clears += 1;
        self.record(BoardEvent::FlagsCleared);
    }
}

impl DelayNs for DummyBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.add_delay(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.add_delay(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.add_delay(ms as u64 * 1_000_000);
    }
}

impl RelayBoard for DummyBoard {
    const TARGET: Target = Target::Dummy;

    fn hardware_init(&mut self) {
        self.initialized = true;
        self.stats.inits += 1;
        self.led = false;
        self.coil1 = false;
        self.coil2 = false;
        self.interrupts_enabled = false;
        self.switch_flag = false;
        self.wake_armed = true;
        self.record(BoardEvent::HardwareInit);
    }
}
