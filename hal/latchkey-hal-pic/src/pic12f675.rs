//! PIC12F675 board
//!
//! ```text
//!             ┌────┐
//!   VDD  pin1 ┤    ├ pin8  GND
//!   GP5  pin2 ┤    ├ pin7  GP0
//!   GP4  pin3 ┤    ├ pin6  GP1
//!   GP3  pin4 ┤    ├ pin5  GP2
//!             └────┘
//! ```
//!
//! - GP5 => relay coil pin 1
//! - GP4 => relay coil pin 2
//! - GP0 => LED anode (high = on)
//! - GP1 => switch, weak pull-up, pressed = 0V
//! - GP2, GP3 => n/c
//!
//! The internal oscillator is fixed at 4MHz, giving 1 MIPS. The oscillator
//! calibration word must be programmed and loaded by the startup code, or
//! every delay is off.
//!
//! GPIO has no latch register, so bit writes to the port would read back
//! pin levels. Outputs are therefore driven from a shadow copy, written as a
//! whole byte.

use embedded_hal::delay::DelayNs;
use latchkey_hal::delay::spin_count;
use latchkey_hal::{
    PowerControl, RelayBoard, RelayCoils, StatusLed, SwitchInput, SwitchLevel, Target,
};

use crate::sfr::SfrBus;
use crate::{CYCLES_PER_SPIN, STARTUP_DELAY_MS};

/// Register addresses (bit 7 = bank 1)
pub mod regs {
    pub const GPIO: u8 = 0x05;
    pub const INTCON: u8 = 0x0B;
    pub const CMCON: u8 = 0x19;
    pub const ADCON0: u8 = 0x1F;
    pub const OPTION_REG: u8 = 0x81;
    pub const TRISIO: u8 = 0x85;
    pub const WPU: u8 = 0x95;
    pub const IOC: u8 = 0x96;
    pub const VRCON: u8 = 0x99;
    pub const ANSEL: u8 = 0x9F;
}

/// INTCON bits
pub mod intcon {
    /// Global interrupt enable
    pub const GIE: u8 = 1 << 7;
    /// GPIO change interrupt enable
    pub const GPIE: u8 = 1 << 3;
    /// GPIO change interrupt flag
    pub const GPIF: u8 = 1 << 0;
}

/// Pin masks within GPIO
pub mod pins {
    pub const LED: u8 = 1 << 0;
    pub const SWITCH: u8 = 1 << 1;
    pub const COIL2: u8 = 1 << 4;
    pub const COIL1: u8 = 1 << 5;
}

/// Instruction rate: Fosc/4 with the 4MHz internal oscillator
pub const INSTRUCTION_HZ: u32 = 1_000_000;

/// Comparator off, lowest-current mode
const CMCON_OFF: u8 = 0x07;

/// PIC12F675 implementation of the board contract
pub struct Pic12f675<B: SfrBus> {
    bus: B,
    /// Output levels last written to GPIO
    shadow: u8,
}

impl<B: SfrBus> Pic12f675<B> {
    /// Wrap a register bus
    pub fn new(bus: B) -> Self {
        Self { bus, shadow: 0 }
    }

    /// Access the register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the register bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn set_output(&mut self, mask: u8, high: bool) {
        if high {
            self.shadow |= mask;
        } else {
            self.shadow &= !mask;
        }
        self.bus.write(regs::GPIO, self.shadow);
    }
}

/// Interrupt service routine body
///
/// Masks every interrupt source. GPIF is left alone and sets again at once
/// while the GPIO mismatch lasts; [`SwitchInput::clear_switch_int_flags`]
/// ends the mismatch and clears it.
pub fn on_interrupt<B: SfrBus>(bus: &mut B) {
    bus.write(regs::INTCON, 0);
}

impl<B: SfrBus> PowerControl for Pic12f675<B> {
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
        // Re-arm right before SLEEP. Relying on the earlier enable let the
        // device work a few times and then stay asleep for good. GIE stays
        // clear: a pending GPIF then turns SLEEP into a NOP instead of
        // vectoring to the ISR, which would disarm GPIE first. A later
        // change wakes the core without vectoring.
        self.bus.write(regs::INTCON, intcon::GPIE);
        self.bus.sleep();
        // the instruction after SLEEP is prefetched
        self.bus.nop();
    }
}

impl<B: SfrBus> StatusLed for Pic12f675<B> {
    fn led_set_high(&mut self) {
        self.set_output(pins::LED, true);
    }

    fn led_set_low(&mut self) {
        self.set_output(pins::LED, false);
    }

    fn led_toggle(&mut self) {
        let on = self.shadow & pins::LED == 0;
        self.set_output(pins::LED, on);
    }
}

impl<B: SfrBus> RelayCoils for Pic12f675<B> {
    fn coil1_set_high(&mut self) {
        self.set_output(pins::COIL1, true);
    }

    fn coil1_set_low(&mut self) {
        self.set_output(pins::COIL1, false);
    }

    fn coil2_set_high(&mut self) {
        self.set_output(pins::COIL2, true);
    }

    fn coil2_set_low(&mut self) {
        self.set_output(pins::COIL2, false);
    }
}

impl<B: SfrBus> SwitchInput for Pic12f675<B> {
    fn switch_level(&mut self) -> SwitchLevel {
        SwitchLevel::from_pin_high(self.bus.bits_set(regs::GPIO, pins::SWITCH))
    }

    fn clear_switch_int_flags(&mut self) {
        // GPIF stays set while the port mismatch persists; a read ends it
        let _ = self.bus.read(regs::GPIO);
        self.bus.clear_bits(regs::INTCON, intcon::GPIF);
    }
}

impl<B: SfrBus> DelayNs for Pic12f675<B> {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..spin_count(ns, INSTRUCTION_HZ, CYCLES_PER_SPIN) {
            self.bus.nop();
        }
    }
}

impl<B: SfrBus> RelayBoard for Pic12f675<B> {
    const TARGET: Target = Target::Pic12f675;

    fn hardware_init(&mut self) {
        self.delay_ms(STARTUP_DELAY_MS);

        // ~GPPU = 0: weak pull-ups enabled
        self.bus.write(regs::OPTION_REG, 0);

        self.bus.write(regs::ANSEL, 0);
        self.bus.write(regs::CMCON, CMCON_OFF);
        self.bus.write(regs::ADCON0, 0);
        self.bus.write(regs::VRCON, 0);

        // Outputs low before the drivers are enabled
        self.shadow = 0;
        self.bus.write(regs::GPIO, 0);
        // GP1 input, GP3 is input-only; GP2 unused, driven low
        self.bus.write(regs::TRISIO, pins::SWITCH | (1 << 3));
        self.bus.write(regs::WPU, pins::SWITCH);

        // Interrupts stay off until the main loop enables them
        self.bus.write(regs::INTCON, 0);
        self.bus.write(regs::IOC, pins::SWITCH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfr::fake::{BusOp, FakeBus, VectoringBus};

    fn board() -> Pic12f675<FakeBus> {
        let mut board = Pic12f675::new(FakeBus::new());
        board.hardware_init();
        board
    }

    #[test]
    fn test_init_registers() {
        let board = board();
        let bus = board.bus();

        assert_eq!(bus.last_write(regs::OPTION_REG), Some(0));
        assert_eq!(bus.last_write(regs::ANSEL), Some(0));
        assert_eq!(bus.last_write(regs::CMCON), Some(0x07));
        assert_eq!(bus.last_write(regs::ADCON0), Some(0));
        assert_eq!(bus.last_write(regs::VRCON), Some(0));
        assert_eq!(bus.last_write(regs::GPIO), Some(0));
        assert_eq!(bus.last_write(regs::TRISIO), Some(0b0000_1010));
        assert_eq!(bus.last_write(regs::WPU), Some(0b0000_0010));
        assert_eq!(bus.last_write(regs::INTCON), Some(0));
        assert_eq!(bus.last_write(regs::IOC), Some(0b0000_0010));
    }

    #[test]
    fn test_init_drives_outputs_low_before_enabling() {
        let board = board();
        let bus = board.bus();

        let gpio = bus.write_index(regs::GPIO, 0).unwrap();
        let tris = bus.write_index(regs::TRISIO, 0b0000_1010).unwrap();
        assert!(gpio < tris);
    }

    #[test]
    fn test_startup_delay() {
        let board = board();
        // 72ms at 1 MIPS, 4 cycles per spin
        assert_eq!(board.bus().nops, 18_000);
    }

    #[test]
    fn test_sleep_rearms_interrupts_first() {
        let mut board = board();
        board.disable_interrupts();

        board.enter_sleep_mode();

        let bus = board.bus();
        assert_eq!(bus.sleeps, 1);
        let at_sleep = bus.at_sleep[0];
        assert_eq!(at_sleep[regs::INTCON as usize], intcon::GPIE);
        assert_eq!(
            bus.ops[bus.ops.len() - 2..],
            [BusOp::Write(regs::INTCON, intcon::GPIE), BusOp::Sleep]
        );
    }

    #[test]
    fn test_pending_change_still_wakes() {
        let mut board = Pic12f675::new(VectoringBus::new(
            regs::INTCON,
            intcon::GIE,
            intcon::GPIE,
            on_interrupt,
        ));
        board.hardware_init();
        board.enable_interrupts();
        board.enter_sleep_mode();

        // wake serviced; release bounce leaves a mismatch during the guard
        board.disable_interrupts();
        board.clear_switch_int_flags();
        board.bus_mut().pending = true;
        board.enable_interrupts();
        assert_eq!(board.bus().vectored, 1);

        board.enter_sleep_mode();

        let bus = board.bus();
        assert_eq!(bus.vectored, 1);
        assert_eq!(bus.intcon_at_sleep(1) & intcon::GPIE, intcon::GPIE);
        assert_eq!(bus.intcon_at_sleep(1) & intcon::GIE, 0);
    }

    #[test]
    fn test_interrupt_mask() {
        let mut board = board();
        board.enter_sleep_mode();
        assert_eq!(board.bus().memory[regs::INTCON as usize], intcon::GPIE);

        board.enable_interrupts();
        assert_eq!(
            board.bus().memory[regs::INTCON as usize],
            intcon::GIE | intcon::GPIE
        );

        board.disable_interrupts();
        assert_eq!(board.bus().memory[regs::INTCON as usize], intcon::GPIE);

        on_interrupt(board.bus_mut());
        assert_eq!(board.bus().memory[regs::INTCON as usize], 0);
    }

    #[test]
    fn test_switch_polarity() {
        let mut board = board();

        board.bus_mut().memory[regs::GPIO as usize] = pins::SWITCH;
        assert_eq!(board.switch_level(), SwitchLevel::High);

        board.bus_mut().memory[regs::GPIO as usize] = 0;
        assert_eq!(board.switch_level(), SwitchLevel::Low);
    }

    #[test]
    fn test_clear_flags() {
        let mut board = board();
        board.bus_mut().memory[regs::INTCON as usize] = intcon::GPIE | intcon::GPIF;

        board.clear_switch_int_flags();

        assert_eq!(board.bus().memory[regs::INTCON as usize], intcon::GPIE);
    }

    #[test]
    fn test_outputs_use_shadow() {
        let mut board = board();
        // Pin readback disagrees with what was driven (e.g. LED loading)
        board.coil1_set_high();
        board.bus_mut().memory[regs::GPIO as usize] = 0;

        board.led_set_high();

        assert_eq!(
            board.bus().last_write(regs::GPIO),
            Some(pins::COIL1 | pins::LED)
        );
    }

    #[test]
    fn test_led_toggle() {
        let mut board = board();
        board.led_toggle();
        assert_eq!(board.bus().last_write(regs::GPIO), Some(pins::LED));
        board.led_toggle();
        assert_eq!(board.bus().last_write(regs::GPIO), Some(0));
    }

    #[test]
    fn test_coils() {
        let mut board = board();
        board.coil2_set_high();
        assert_eq!(board.bus().last_write(regs::GPIO), Some(pins::COIL2));
        board.release_coils();
        assert_eq!(board.bus().last_write(regs::GPIO), Some(0));
    }

    #[test]
    fn test_delay_ms() {
        let mut board = board();
        let before = board.bus().nops;
        board.delay_ms(25);
        assert_eq!(board.bus().nops - before, 6_250);
    }
}
