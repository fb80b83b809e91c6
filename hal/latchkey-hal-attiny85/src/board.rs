//! ATtiny85 board implementation

use avr_device::attiny85::{Peripherals, AC, ADC, CPU, EXINT, PORTB};
use embedded_hal::delay::DelayNs;
use latchkey_hal::delay::spin_count;
use latchkey_hal::{
    PowerControl, RelayBoard, RelayCoils, StatusLed, SwitchInput, SwitchLevel, Target,
};

use crate::{pins, CYCLES_PER_SPIN, STARTUP_DELAY_MS};

/// ATtiny85 implementation of the board contract
///
/// Owns the register blocks it touches. The wake ISR has no access to the
/// board and works through [`on_pin_change`] instead.
pub struct Attiny85 {
    cpu: CPU,
    exint: EXINT,
    portb: PORTB,
    adc: ADC,
    ac: AC,
    cpu_hz: u32,
}

impl Attiny85 {
    /// Take the register blocks out of `dp`
    ///
    /// `cpu_hz` is the effective CPU clock after the fuse/CLKPR divider and
    /// only feeds delay calibration.
    pub fn new(dp: Peripherals, cpu_hz: u32) -> Self {
        Self {
            cpu: dp.CPU,
            exint: dp.EXINT,
            portb: dp.PORTB,
            adc: dp.ADC,
            ac: dp.AC,
            cpu_hz,
        }
    }

    #[allow(unsafe_code)]
    fn configure_port(&mut self) {
        // SAFETY: every bit pattern is valid for DDRB/PORTB; interrupts are
        // still masked at this point
        unsafe {
            self.portb.portb().write(|w| w.bits(pins::INITIAL_PORT));
            self.portb.ddrb().write(|w| w.bits(pins::OUTPUTS));
        }
    }
}

/// Wake interrupt body, called from the `PCINT0` vector
///
/// Masks the pin-change source so switch bounce cannot re-enter the ISR
/// while the press is being debounced. The global flag is restored by `reti`
/// and cleared again by the control loop's `disable_interrupts`. The source
/// stays disarmed until the next `enter_sleep_mode`, which re-arms it with
/// interrupts masked.
pub fn on_pin_change(exint: &EXINT) {
    exint.gimsk().modify(|_, w| w.pcie().clear_bit());
}

impl PowerControl for Attiny85 {
    fn disable_interrupts(&mut self) {
        avr_device::interrupt::disable();
    }

    #[allow(unsafe_code)]
    fn enable_interrupts(&mut self) {
        // SAFETY: not called inside a critical section
        unsafe { avr_device::interrupt::enable() };
    }

    fn disable_sleep(&mut self) {
        self.cpu.mcucr().modify(|_, w| w.se().clear_bit());
    }

    #[allow(unsafe_code)]
    fn enter_sleep_mode(&mut self) {
        // Re-arm under the global mask. With I set, a PCIF latched by release
        // bounce would vector on the PCIE store and the ISR would disarm
        // PCIE again before the sleep below.
        avr_device::interrupt::disable();
        self.exint.gimsk().modify(|_, w| w.pcie().set_bit());
        self.cpu.mcucr().modify(|_, w| w.se().set_bit());

        // The instruction after SEI always runs before a pending interrupt
        // is taken: SLEEP executes, then a pending PCIF wakes the core at
        // once.
        // SAFETY: the wake ISR only touches GIMSK
        #[cfg(target_arch = "avr")]
        unsafe {
            core::arch::asm!("sei", "sleep");
        }
    }
}

impl StatusLed for Attiny85 {
    fn led_set_high(&mut self) {
        self.portb.portb().modify(|_, w| w.pb1().set_bit());
    }

    fn led_set_low(&mut self) {
        self.portb.portb().modify(|_, w| w.pb1().clear_bit());
    }

    fn led_toggle(&mut self) {
        self.portb
            .portb()
            .modify(|r, w| w.pb1().bit(!r.pb1().bit()));
    }
}

impl RelayCoils for Attiny85 {
    fn coil1_set_high(&mut self) {
        self.portb.portb().modify(|_, w| w.pb3().set_bit());
    }

    fn coil1_set_low(&mut self) {
        self.portb.portb().modify(|_, w| w.pb3().clear_bit());
    }

    fn coil2_set_high(&mut self) {
        self.portb.portb().modify(|_, w| w.pb2().set_bit());
    }

    fn coil2_set_low(&mut self) {
        self.portb.portb().modify(|_, w| w.pb2().clear_bit());
    }
}

impl SwitchInput for Attiny85 {
    fn switch_level(&mut self) -> SwitchLevel {
        SwitchLevel::from_pin_high(self.portb.pinb().read().pb0().bit_is_set())
    }

    fn clear_switch_int_flags(&mut self) {
        // PCIF is cleared by writing a one
        self.exint.gifr().write(|w| w.pcif().set_bit());
    }
}

impl DelayNs for Attiny85 {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..spin_count(ns, self.cpu_hz, CYCLES_PER_SPIN) {
            avr_device::asm::nop();
        }
    }
}

impl RelayBoard for Attiny85 {
    const TARGET: Target = Target::Attiny85;

    fn hardware_init(&mut self) {
        self.delay_ms(STARTUP_DELAY_MS);

        self.configure_port();

        // ADC first: PRADC must not be set while the ADC is enabled
        self.adc.adcsra().modify(|_, w| w.aden().clear_bit());
        self.ac.acsr().modify(|_, w| w.acd().set_bit());
        self.cpu.prr().write(|w| {
            w.pradc()
                .set_bit()
                .prusi()
                .set_bit()
                .prtim0()
                .set_bit()
                .prtim1()
                .set_bit()
        });

        self.exint.pcmsk().write(|w| w.pcint0().set_bit());
        self.exint.gimsk().write(|w| w.pcie().set_bit());
        self.cpu.mcucr().modify(|_, w| w.sm().pdown());

        self.delay_ms(STARTUP_DELAY_MS);
    }
}
