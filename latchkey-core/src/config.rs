//! Compile-time tunables
//!
//! None of these are runtime-configurable. The firmware build script reads
//! `latchkey.toml`, checks it with [`Tunables::validate`] and emits a
//! `const` [`Tunables`] for the selected target.

/// Width of the debounce shift register
///
/// A press is accepted once this many consecutive samples read pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceWidth {
    /// 8 consecutive samples
    #[default]
    Eight,
    /// 16 consecutive samples
    Sixteen,
}

impl DebounceWidth {
    /// Number of consecutive pressed samples required
    pub const fn bits(self) -> u8 {
        match self {
            DebounceWidth::Eight => 8,
            DebounceWidth::Sixteen => 16,
        }
    }

    /// Register value meaning "every sample pressed"
    pub const fn target(self) -> u16 {
        match self {
            DebounceWidth::Eight => 0x00FF,
            DebounceWidth::Sixteen => 0xFFFF,
        }
    }

    /// Parse a bit count (8 or 16)
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(DebounceWidth::Eight),
            16 => Some(DebounceWidth::Sixteen),
            _ => None,
        }
    }
}

/// Pause between two debounce samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleInterval {
    /// Milliseconds
    Millis(u16),
    /// Microseconds
    Micros(u16),
}

impl SampleInterval {
    /// Interval length in microseconds
    pub const fn as_micros(self) -> u32 {
        match self {
            SampleInterval::Millis(ms) => ms as u32 * 1000,
            SampleInterval::Micros(us) => us as u32,
        }
    }

    /// Check if the interval is zero
    pub const fn is_zero(self) -> bool {
        self.as_micros() == 0
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        SampleInterval::Millis(1)
    }
}

/// Shortest accepted coil pulse (ms)
///
/// Common 5V latching relays specify 3ms; anything below this is a typo.
pub const MIN_RELAY_SETTLE_MS: u16 = 5;

/// Longest accepted coil pulse (ms)
///
/// The pulse is a busy-wait with interrupts masked; longer pulses only waste
/// battery.
pub const MAX_RELAY_SETTLE_MS: u16 = 500;

/// Shortest accepted post-action guard (ms)
pub const MIN_SWITCH_DEBOUNCE_MS: u16 = 10;

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Relay pulse shorter than [`MIN_RELAY_SETTLE_MS`]
    SettleTooShort,
    /// Relay pulse longer than [`MAX_RELAY_SETTLE_MS`]
    SettleTooLong,
    /// Debounce read budget cannot fit a single full-width run
    MaxReadsBelowWidth,
    /// Debounce samples would be taken back-to-back
    ZeroSampleInterval,
    /// Post-action guard shorter than [`MIN_SWITCH_DEBOUNCE_MS`]
    GuardTooShort,
}

impl ConfigError {
    /// Short description for build-time error messages
    pub const fn message(self) -> &'static str {
        match self {
            ConfigError::SettleTooShort => "relay settle time below 5ms",
            ConfigError::SettleTooLong => "relay settle time above 500ms",
            ConfigError::MaxReadsBelowWidth => "debounce max reads below debounce width",
            ConfigError::ZeroSampleInterval => "debounce sample interval is zero",
            ConfigError::GuardTooShort => "switch debounce guard below 10ms",
        }
    }
}

/// All compile-time tunables of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tunables {
    /// How long a coil is held energized (ms)
    ///
    /// Relay-specific. Takamisawa AL5WN-K and Panasonic TQ2-L-5V specify
    /// 3ms; Kemet EC2-3TNU suggests 10ms to ride out contact bounce.
    pub relay_settle_ms: u16,
    /// Hold-off after acting on a press, so release bounce cannot retrigger (ms)
    pub switch_debounce_ms: u16,
    /// Consecutive pressed samples required
    pub debounce_width: DebounceWidth,
    /// Upper bound on debounce samples before giving up
    pub debounce_max_reads: u16,
    /// Pause between debounce samples
    pub debounce_interval: SampleInterval,
    /// Number of LED blinks at boot (0 disables the greeting)
    pub greeting_blinks: u8,
    /// On and off time of each greeting blink (ms)
    pub greeting_period_ms: u16,
}

impl Tunables {
    /// Values proven on the reference circuit
    pub const DEFAULT: Tunables = Tunables {
        relay_settle_ms: 25,
        switch_debounce_ms: 100,
        debounce_width: DebounceWidth::Eight,
        debounce_max_reads: 4095,
        debounce_interval: SampleInterval::Millis(1),
        greeting_blinks: 4,
        greeting_period_ms: 250,
    };

    /// Check that the values describe a working device
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.relay_settle_ms < MIN_RELAY_SETTLE_MS {
            return Err(ConfigError::SettleTooShort);
        }
        if self.relay_settle_ms > MAX_RELAY_SETTLE_MS {
            return Err(ConfigError::SettleTooLong);
        }
        if self.debounce_max_reads < self.debounce_width.bits() as u16 {
            return Err(ConfigError::MaxReadsBelowWidth);
        }
        if self.debounce_interval.is_zero() {
            return Err(ConfigError::ZeroSampleInterval);
        }
        if self.switch_debounce_ms < MIN_SWITCH_DEBOUNCE_MS {
            return Err(ConfigError::GuardTooShort);
        }
        Ok(())
    }

    /// Worst-case time spent debouncing a single wake (µs)
    pub const fn debounce_budget_us(&self) -> u32 {
        self.debounce_max_reads as u32 * self.debounce_interval.as_micros()
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tunables::DEFAULT.validate(), Ok(()));
        assert_eq!(Tunables::default(), Tunables::DEFAULT);
    }

    #[test]
    fn test_default_is_valid_at_compile_time() {
        const _: () = assert!(Tunables::DEFAULT.validate().is_ok());
    }

    #[test]
    fn test_settle_bounds() {
        let mut t = Tunables::DEFAULT;
        t.relay_settle_ms = 4;
        assert_eq!(t.validate(), Err(ConfigError::SettleTooShort));
        t.relay_settle_ms = 501;
        assert_eq!(t.validate(), Err(ConfigError::SettleTooLong));
        t.relay_settle_ms = 15;
        assert_eq!(t.validate(), Ok(()));
    }

    #[test]
    fn test_max_reads_must_cover_width() {
        let mut t = Tunables::DEFAULT;
        t.debounce_width = DebounceWidth::Sixteen;
        t.debounce_max_reads = 15;
        assert_eq!(t.validate(), Err(ConfigError::MaxReadsBelowWidth));
        t.debounce_max_reads = 16;
        assert_eq!(t.validate(), Ok(()));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut t = Tunables::DEFAULT;
        t.debounce_interval = SampleInterval::Micros(0);
        assert_eq!(t.validate(), Err(ConfigError::ZeroSampleInterval));
        t.debounce_interval = SampleInterval::Micros(50);
        assert_eq!(t.validate(), Ok(()));
    }

    #[test]
    fn test_guard_too_short() {
        let mut t = Tunables::DEFAULT;
        t.switch_debounce_ms = 0;
        assert_eq!(t.validate(), Err(ConfigError::GuardTooShort));
    }

    #[test]
    fn test_debounce_width() {
        assert_eq!(DebounceWidth::Eight.target(), 0xFF);
        assert_eq!(DebounceWidth::Sixteen.target(), 0xFFFF);
        assert_eq!(DebounceWidth::from_bits(16), Some(DebounceWidth::Sixteen));
        assert_eq!(DebounceWidth::from_bits(12), None);
    }

    #[test]
    fn test_debounce_budget() {
        // 4095 reads at 1ms each
        assert_eq!(Tunables::DEFAULT.debounce_budget_us(), 4_095_000);
    }
}
