//! PIC10F320 board
//!
//! ```text
//!                        ┌────┐
//!   n/c             pin1 ┤    ├ pin8  RA3/~MCLR/VPP/IOC3
//!   VDD             pin2 ┤    ├ pin7  VSS
//!   RA2/INT/IOC2    pin3 ┤    ├ pin6  n/c
//!   ICSPCLK/RA1     pin4 ┤    ├ pin5  RA0/ICSPDAT
//!                        └────┘
//! ```
//!
//! - RA2 => relay coil pin 1
//! - RA1 => relay coil pin 2
//! - RA0 => gate of the NPN sinking the LED cathode (high = on)
//! - RA3 => momentary switch to GND (input-only pin, MCLR disabled)
//!
//! Outputs go through LATA, so there is no read-modify-write hazard on the
//! port.

use embedded_hal::delay::DelayNs;
use latchkey_hal::delay::spin_count;
use latchkey_hal::{
    PowerControl, RelayBoard, RelayCoils, StatusLed, SwitchInput, SwitchLevel, Target,
};

use crate::sfr::SfrBus;
use crate::{CYCLES_PER_SPIN, STARTUP_DELAY_MS};

/// Register addresses (single bank)
pub mod regs {
    pub const PORTA: u8 = 0x05;
    pub const TRISA: u8 = 0x06;
    pub const LATA: u8 = 0x07;
    pub const ANSELA: u8 = 0x08;
    pub const WPUA: u8 = 0x09;
    pub const INTCON: u8 = 0x0B;
    pub const OPTION_REG: u8 = 0x0E;
    pub const OSCCON: u8 = 0x10;
    pub const IOCAP: u8 = 0x1A;
    pub const IOCAN: u8 = 0x1B;
    pub const IOCAF: u8 = 0x1C;
    pub const FVRCON: u8 = 0x1D;
    pub const ADCON: u8 = 0x1F;
    pub const CWG1CON0: u8 = 0x39;
    pub const VREGCON: u8 = 0x3E;
}

/// INTCON bits
pub mod intcon {
    /// Global interrupt enable
    pub const GIE: u8 = 1 << 7;
    /// Interrupt-on-change enable
    pub const IOCIE: u8 = 1 << 3;
    /// Interrupt-on-change flag (read-only OR of IOCAF)
    pub const IOCIF: u8 = 1 << 0;
}

/// Pin masks within PORTA/LATA
pub mod pins {
    pub const LED: u8 = 1 << 0;
    pub const COIL2: u8 = 1 << 1;
    pub const COIL1: u8 = 1 << 2;
    pub const SWITCH: u8 = 1 << 3;
}

/// OSCCON.IRCF = 011: 1MHz HFINTOSC (reset default is 8MHz)
const OSCCON_1MHZ: u8 = 0b0011_0000;

/// VREGCON: low-power sleep regulator, reserved bit 0 kept set
const VREGCON_LOW_POWER_SLEEP: u8 = 0b0000_0011;

/// Instruction rate: Fosc/4 at 1MHz
pub const INSTRUCTION_HZ: u32 = 250_000;

/// PIC10F320 implementation of the board contract
pub struct Pic10f320<B: SfrBus> {
    bus: B,
}

impl<B: SfrBus> Pic10f320<B> {
    /// Wrap a register bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Access the register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the register bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

}

/// Interrupt service routine body
///
/// Masks every interrupt source. IOCAF is left alone: the latched falling
/// edge is what [`SwitchInput::switch_level`] checks for afterwards, and
/// [`SwitchInput::clear_switch_int_flags`] clears it.
pub fn on_interrupt<B: SfrBus>(bus: &mut B) {
    bus.write(regs::INTCON, 0);
}

impl<B: SfrBus> PowerControl for Pic10f320<B> {
    fn disable_interrupts(&mut self) {
        self.bus.clear_bits(regs::INTCON, intcon::GIE);
    }

    fn enable_interrupts(&mut self) {
        self.bus.set_bits(regs::INTCON, intcon::GIE);
    }

    fn disable_sleep(&mut self) {
        // no sleep-enable latch on this part
    }

    fn enter_sleep_mode(&mut self) {
        // Must happen immediately before SLEEP, see `PowerControl`. GIE
        // stays clear so an edge latched during the guard turns SLEEP into a
        // NOP instead of vectoring and disarming IOCIE first.
        self.bus.write(regs::IOCAP, 0);
        self.bus.write(regs::IOCAN, pins::SWITCH);
        self.bus.write(regs::INTCON, intcon::IOCIE);
        self.bus.sleep();
        self.bus.nop();
    }
}

impl<B: SfrBus> StatusLed for Pic10f320<B> {
    fn led_set_high(&mut self) {
        self.bus.set_bits(regs::LATA, pins::LED);
    }

    fn led_set_low(&mut self) {
        self.bus.clear_bits(regs::LATA, pins::LED);
    }

    fn led_toggle(&mut self) {
        self.bus.modify(regs::LATA, |v| v ^ pins::LED);
    }
}

impl<B: SfrBus> RelayCoils for Pic10f320<B> {
    fn coil1_set_high(&mut self) {
        self.bus.set_bits(regs::LATA, pins::COIL1);
    }

    fn coil1_set_low(&mut self) {
        self.bus.clear_bits(regs::LATA, pins::COIL1);
    }

    fn coil2_set_high(&mut self) {
        self.bus.set_bits(regs::LATA, pins::COIL2);
    }

    fn coil2_set_low(&mut self) {
        self.bus.clear_bits(regs::LATA, pins::COIL2);
    }
}

impl<B: SfrBus> SwitchInput for Pic10f320<B> {
    /// Pressed only if a falling edge on RA3 was latched and RA3 is still low
    ///
    /// A low level without a latched edge reads as released. This rejects
    /// reads left over from before the wake.
    fn switch_level(&mut self) -> SwitchLevel {
        let edge_latched = self.bus.bits_set(regs::INTCON, intcon::IOCIF)
            && self.bus.bits_set(regs::IOCAF, pins::SWITCH);
        let pin_low = !self.bus.bits_set(regs::PORTA, pins::SWITCH);

        SwitchLevel::from_pin_high(!(edge_latched && pin_low))
    }

    fn clear_switch_int_flags(&mut self) {
        self.bus.write(regs::IOCAF, 0);
    }
}

impl<B: SfrBus> DelayNs for Pic10f320<B> {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..spin_count(ns, INSTRUCTION_HZ, CYCLES_PER_SPIN) {
            self.bus.nop();
        }
    }
}

impl<B: SfrBus> RelayBoard for Pic10f320<B> {
    const TARGET: Target = Target::Pic10f320;

    fn hardware_init(&mut self) {
        // Clock first: the delay below is calibrated for 1MHz, not the
        // 8MHz reset default
        self.bus.write(regs::OSCCON, OSCCON_1MHZ);
        self.delay_ms(STARTUP_DELAY_MS);

        // ~WPUEN = 0: weak pull-ups enabled
        self.bus.write(regs::OPTION_REG, 0);
        self.bus.write(regs::INTCON, 0);

        self.bus.write(regs::CWG1CON0, 0);
        self.bus.write(regs::ANSELA, 0);
        self.bus.write(regs::ADCON, 0);
        self.bus.write(regs::FVRCON, 0);

        self.bus.write(regs::LATA, 0);
        self.bus.write(regs::TRISA, pins::SWITCH);
        self.bus.write(regs::WPUA, pins::SWITCH);

        self.bus.write(regs::IOCAP, 0);
        self.bus.write(regs::IOCAN, pins::SWITCH);
        self.bus.write(regs::IOCAF, 0);

        self.bus.write(regs::VREGCON, VREGCON_LOW_POWER_SLEEP);
    }
}
