//! GPIO pin abstractions
//!
//! Every board has exactly four pins of interest: one switch input (pulled
//! high, active-low), one status LED output (active-high) and two relay coil
//! outputs. The traits below expose them as named operations rather than
//! generic pins, since each target hard-wires the assignment.

/// Logic level read from the switch pin
///
/// All targets use the same convention: the pin idles at its pull-up level
/// and a press shorts it to ground. Implementations must translate their raw
/// register reads into this type, so callers never deal with inverted
/// polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchLevel {
    /// Pin at pull-up level (switch released)
    High,
    /// Pin pulled to ground (switch pressed)
    Low,
}

impl SwitchLevel {
    /// Check if this level means the switch is held down
    pub fn is_pressed(self) -> bool {
        self == SwitchLevel::Low
    }

    /// Build a level from a raw pin read (`true` = pin high)
    pub fn from_pin_high(high: bool) -> Self {
        if high {
            SwitchLevel::High
        } else {
            SwitchLevel::Low
        }
    }
}

/// Status indicator LED
///
/// Convention: LED on = pin driven high.
pub trait StatusLed {
    /// Drive the LED pin high (LED on)
    fn led_set_high(&mut self);

    /// Drive the LED pin low (LED off)
    fn led_set_low(&mut self);

    /// Flip the LED pin
    fn led_toggle(&mut self);

    /// Drive the LED to mirror `on`
    fn led_set_state(&mut self, on: bool) {
        if on {
            self.led_set_high();
        } else {
            self.led_set_low();
        }
    }
}

/// Latching relay coil drive
///
/// Raw pin control only. There is no timing and no interlock at this layer;
/// the caller owns pulse sequencing and must never leave both pins high.
pub trait RelayCoils {
    /// Drive coil pin 1 (set/activate side) high
    fn coil1_set_high(&mut self);

    /// Drive coil pin 1 low
    fn coil1_set_low(&mut self);

    /// Drive coil pin 2 (reset/deactivate side) high
    fn coil2_set_high(&mut self);

    /// Drive coil pin 2 low
    fn coil2_set_low(&mut self);

    /// Drive both coil pins low
    fn release_coils(&mut self) {
        self.coil2_set_low();
        self.coil1_set_low();
    }
}

/// Momentary switch input
pub trait SwitchInput {
    /// Read the current switch level
    ///
    /// Takes `&mut self` because some targets qualify the read with latched
    /// interrupt flags.
    fn switch_level(&mut self) -> SwitchLevel;

    /// Clear any latched interrupt-pending flag for the switch pin
    ///
    /// Required on targets whose interrupt controller latches edge flags
    /// independently of the enable bit. A no-op elsewhere.
    fn clear_switch_int_flags(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLed {
        high: bool,
    }

    impl StatusLed for MockLed {
        fn led_set_high(&mut self) {
            self.high = true;
        }

        fn led_set_low(&mut self) {
            self.high = false;
        }

        fn led_toggle(&mut self) {
            self.high = !self.high;
        }
    }

    struct MockCoils {
        coil1: bool,
        coil2: bool,
    }

    impl RelayCoils for MockCoils {
        fn coil1_set_high(&mut self) {
            self.coil1 = true;
        }

        fn coil1_set_low(&mut self) {
            self.coil1 = false;
        }

        fn coil2_set_high(&mut self) {
            self.coil2 = true;
        }

        fn coil2_set_low(&mut self) {
            self.coil2 = false;
        }
    }

    #[test]
    fn test_switch_level_polarity() {
        assert!(SwitchLevel::Low.is_pressed());
        assert!(!SwitchLevel::High.is_pressed());
        assert_eq!(SwitchLevel::from_pin_high(true), SwitchLevel::High);
        assert_eq!(SwitchLevel::from_pin_high(false), SwitchLevel::Low);
    }

    #[test]
    fn test_led_set_state() {
        let mut led = MockLed { high: false };
        led.led_set_state(true);
        assert!(led.high);
        led.led_set_state(false);
        assert!(!led.high);
        led.led_toggle();
        assert!(led.high);
    }

    #[test]
    fn test_release_coils() {
        let mut coils = MockCoils {
            coil1: true,
            coil2: true,
        };
        coils.release_coils();
        assert!(!coils.coil1);
        assert!(!coils.coil2);
    }
}
