//! Complete board contract
//!
//! A [`RelayBoard`] is everything the control loop touches. Exactly one
//! implementation is linked into a firmware image, picked by a cargo feature
//! on `latchkey-firmware`.

use embedded_hal::delay::DelayNs;

use crate::gpio::{RelayCoils, StatusLed, SwitchInput};
use crate::power::PowerControl;

/// Supported build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// Host-side test double, never flashed to a device
    Dummy,
    /// Microchip (Atmel) ATtiny85
    Attiny85,
    /// Microchip PIC12F675
    Pic12f675,
    /// Microchip PIC10F320
    Pic10f320,
}

impl Target {
    /// Human-readable chip name
    pub fn name(self) -> &'static str {
        match self {
            Target::Dummy => "dummy",
            Target::Attiny85 => "attiny85",
            Target::Pic12f675 => "pic12f675",
            Target::Pic10f320 => "pic10f320",
        }
    }
}

/// The full hardware contract for the relay controller
///
/// Pin wiring per target:
///
/// | Role        | ATtiny85 | PIC12F675 | PIC10F320 |
/// |-------------|----------|-----------|-----------|
/// | switch      | PB0      | GP1       | RA3       |
/// | status LED  | PB1      | GP0       | RA0       |
/// | coil pin 1  | PB3      | GP5       | RA2       |
/// | coil pin 2  | PB2      | GP4       | RA1       |
pub trait RelayBoard: PowerControl + StatusLed + RelayCoils + SwitchInput + DelayNs {
    /// Which chip this implementation drives
    const TARGET: Target;

    /// One-time hardware setup, called once at boot before anything else
    ///
    /// Must apply any settle delay, configure the switch as a pulled-up
    /// input and the LED and both coil pins as outputs driven low, disable
    /// unused peripherals (ADC, comparator, voltage reference), arm the
    /// pin-change interrupt for the switch, and select the lowest-power sleep
    /// mode that still wakes on pin change.
    fn hardware_init(&mut self);
}
