//! Events that trigger state transitions

/// Events in the life of one wake cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeEvent {
    /// Hardware initialized and baseline established
    BootComplete,
    /// Pin-change interrupt ended the sleep instruction
    Wake,
    /// Debounce saw a full run of pressed samples
    PressConfirmed,
    /// Debounce budget ran out (noise, or a release edge)
    DebounceTimedOut,
    /// Relay toggled, LED toggled, post-action guard elapsed
    ActionComplete,
}
