//! Special function register bus
//!
//! Mid-range PICs have no memory-mapped peripherals in the ARM sense: every
//! peripheral is a byte-wide SFR in data memory. Addresses here are linear:
//! bit 7 selects bank 1 on banked parts (PIC12F675), and is always clear on
//! the single-bank PIC10F320.

/// Register-level access to the chip
pub trait SfrBus {
    /// Read an SFR
    fn read(&mut self, addr: u8) -> u8;

    /// Write an SFR
    fn write(&mut self, addr: u8, value: u8);

    /// Execute the `SLEEP` instruction
    ///
    /// Returns after the wake interrupt has been serviced (or immediately if
    /// a wake condition was already pending).
    fn sleep(&mut self);

    /// Execute a single `NOP`
    fn nop(&mut self);

    /// Read-modify-write an SFR
    fn modify(&mut self, addr: u8, f: impl FnOnce(u8) -> u8) {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Set the bits in `mask`
    fn set_bits(&mut self, addr: u8, mask: u8) {
        self.modify(addr, |v| v | mask);
    }

    /// Clear the bits in `mask`
    fn clear_bits(&mut self, addr: u8, mask: u8) {
        self.modify(addr, |v| v & !mask);
    }

    /// Check if any bit in `mask` is set
    fn bits_set(&mut self, addr: u8, mask: u8) -> bool {
        self.read(addr) & mask != 0
    }
}

/// Split a linear SFR address into `(bank 1 selected, offset within bank)`
///
/// The device bus sets STATUS.RP0 from the first value before accessing the
/// offset.
pub fn bank_select(addr: u8) -> (bool, u8) {
    (addr & 0x80 != 0, addr & 0x7F)
}

/// STATUS register, mirrored in every bank
pub const STATUS: u8 = 0x03;

/// STATUS.RP0 bank select bit
pub const STATUS_RP0: u8 = 1 << 5;


#[cfg(test)]
mod tests {
    use super::fake::FakeBus;
    use super::*;

    #[test]
    fn test_bank_select() {
        assert_eq!(bank_select(0x05), (false, 0x05));
        assert_eq!(bank_select(0x85), (true, 0x05));
        assert_eq!(bank_select(0x9F), (true, 0x1F));
    }

    #[test]
    fn test_bit_helpers() {
        let mut bus = FakeBus::new();
        bus.set_bits(0x05, 0b0001_0001);
        assert_eq!(bus.memory[0x05], 0b0001_0001);
        bus.clear_bits(0x05, 0b0000_0001);
        assert_eq!(bus.memory[0x05], 0b0001_0000);
        assert!(bus.bits_set(0x05, 0b0001_0000));
        assert!(!bus.bits_set(0x05, 0b0000_0001));
    }
}
