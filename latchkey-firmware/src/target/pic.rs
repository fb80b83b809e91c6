//! PIC12F675 / PIC10F320 targets
//!
//! There is no upstream rustc backend for the PIC mid-range core. These
//! targets are built with an out-of-tree PIC code generator whose runtime
//! provides the reset vector (calling `main`), the interrupt vector (calling
//! `latchkey_isr` with context save) and two single-instruction shims,
//! `latchkey_pic_sleep` and `latchkey_pic_nop`.

use core::ptr;

use latchkey_core::Controller;
use latchkey_hal_pic::sfr::{bank_select, SfrBus, STATUS, STATUS_RP0};

use crate::config::TUNABLES;

#[cfg(feature = "target-pic12f675")]
use latchkey_hal_pic::{pic12f675::on_interrupt, Pic12f675 as Board};

#[cfg(feature = "target-pic10f320")]
use latchkey_hal_pic::{pic10f320::on_interrupt, Pic10f320 as Board};

extern "C" {
    fn latchkey_pic_sleep();
    fn latchkey_pic_nop();
}

/// Volatile data-memory access with STATUS.RP0 banking
pub struct DeviceBus {
    bank1: bool,
}

impl DeviceBus {
    /// # Safety
    ///
    /// Only one bus may exist outside the ISR, and it must be created before
    /// any SFR is touched so the cached bank matches STATUS.RP0 (clear at
    /// reset).
    pub const unsafe fn new() -> Self {
        Self { bank1: false }
    }

    fn select(&mut self, addr: u8) -> u8 {
        let (bank1, offset) = bank_select(addr);
        if bank1 != self.bank1 {
            // SAFETY: STATUS is mirrored in every bank, only RP0 changes
            unsafe {
                let status = STATUS as usize as *mut u8;
                let value = ptr::read_volatile(status);
                let value = if bank1 {
                    value | STATUS_RP0
                } else {
                    value & !STATUS_RP0
                };
                ptr::write_volatile(status, value);
            }
            self.bank1 = bank1;
        }
        offset
    }
}

impl SfrBus for DeviceBus {
    fn read(&mut self, addr: u8) -> u8 {
        let offset = self.select(addr);
        // SAFETY: `offset` is an SFR address of the selected bank
        unsafe { ptr::read_volatile(offset as usize as *const u8) }
    }

    fn write(&mut self, addr: u8, value: u8) {
        let offset = self.select(addr);
        // SAFETY: `offset` is an SFR address of the selected bank
        unsafe { ptr::write_volatile(offset as usize as *mut u8, value) }
    }

    fn sleep(&mut self) {
        // SAFETY: single instruction, no memory effects
        unsafe { latchkey_pic_sleep() }
    }

    fn nop(&mut self) {
        // SAFETY: single instruction, no memory effects
        unsafe { latchkey_pic_nop() }
    }
}

/// Bank-0-only bus for the interrupt vector
///
/// INTCON is mirrored in every bank, so the ISR never touches RP0 and the
/// main loop's cached bank stays valid.
struct IsrBus;

impl SfrBus for IsrBus {
    fn read(&mut self, addr: u8) -> u8 {
        // SAFETY: only ever called with INTCON
        unsafe { ptr::read_volatile(bank_select(addr).1 as usize as *const u8) }
    }

    fn write(&mut self, addr: u8, value: u8) {
        // SAFETY: only ever called with INTCON
        unsafe { ptr::write_volatile(bank_select(addr).1 as usize as *mut u8, value) }
    }

    fn sleep(&mut self) {}

    fn nop(&mut self) {}
}

#[no_mangle]
pub extern "C" fn main() -> ! {
    // SAFETY: first and only bus, created before any register access
    let bus = unsafe { DeviceBus::new() };
    Controller::new(Board::new(bus), TUNABLES).run()
}

#[no_mangle]
pub extern "C" fn latchkey_isr() {
    on_interrupt(&mut IsrBus);
}

/// Link-time panic check, see the ATtiny85 target
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    extern "C" {
        fn a_panic_is_reachable() -> !;
    }
    // SAFETY: if this were reachable, the image would not link
    unsafe { a_panic_is_reachable() }
}
