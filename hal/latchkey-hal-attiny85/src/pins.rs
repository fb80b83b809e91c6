//! PORTB pin roles
//!
//! ```text
//!                                     ┌───╥───┐
//!        (PCINT5/~RESET/ADC0/dB) PB5 ━┥ 1   8 ┝━ VCC
//! (PCINT3/XTAL1/CLKI/~OC1B/ADC3) PB3 ━┥ 2   7 ┝━ PB2 (SCK/USCK/SCL/ADC1/T0/INT0/PCINT2)
//!  (PCINT4/XTAL2/CLKO/OC1B/ADC2) PB4 ━┥ 3   6 ┝━ PB1 (MISO/DO/AIN1/OC0B/OC1A/PCINT1)
//!                                GND ━┥ 4   5 ┝━ PB0 (MOSI/DI/SDA/AIN0/OC0A/~OC1A/AREF/PCINT0)
//!                                     └───────┘
//! ```
//!
//! PB5 keeps its reset function so the part stays ISP-programmable. PB4 is
//! unused and left as an input with its pull-up on.

/// Momentary switch to GND, internal pull-up, PCINT0 wake source
pub const SWITCH: u8 = 1 << 0;
/// Status LED, high = on
pub const LED: u8 = 1 << 1;
/// Relay coil pin 2 (reset coil)
pub const COIL2: u8 = 1 << 2;
/// Relay coil pin 1 (set coil)
pub const COIL1: u8 = 1 << 3;
/// Unused pin, parked as a pulled-up input
pub const SPARE: u8 = 1 << 4;

/// DDRB: LED and both coil pins are outputs
pub const OUTPUTS: u8 = LED | COIL1 | COIL2;

/// PORTB at init: outputs low, pull-ups on the inputs
pub const INITIAL_PORT: u8 = SWITCH | SPARE;
