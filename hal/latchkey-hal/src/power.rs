//! Interrupt and sleep control
//!
//! The firmware has a single thread of execution plus one interrupt whose
//! only job is to end the sleep instruction. These operations are the whole
//! surface the control loop needs to manage that.

/// Global interrupt mask and low-power sleep control
pub trait PowerControl {
    /// Mask all interrupts
    ///
    /// Only single-level use is required: the control loop never nests a
    /// disable inside another disable.
    fn disable_interrupts(&mut self);

    /// Unmask interrupts
    fn enable_interrupts(&mut self);

    /// Clear any "sleep requested" latch
    ///
    /// Prevents a stray sleep instruction from halting the device without the
    /// wake source being re-armed. A no-op on targets without such a latch.
    fn disable_sleep(&mut self);

    /// Arm the wake interrupt and halt until an interrupt or reset occurs
    ///
    /// Targets that need the wake source re-armed right before the sleep
    /// instruction must do so here. This is not optional: enabling interrupts
    /// earlier in the loop has been observed to leave a PIC asleep forever
    /// after a few cycles.
    ///
    /// The source must be re-armed while the ISR cannot vector. A switch
    /// flag latched during the previous wake (release bounce) would
    /// otherwise run the ISR, which disarms the source again, right before
    /// the sleep instruction. With the flag still pending the sleep must end
    /// at once instead. Returns once the device is awake.
    fn enter_sleep_mode(&mut self);
}

